//! Static English/Arabic string tables
//!
//! Both tables carry exactly the same keys.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::language::Language;

type Table = HashMap<&'static str, &'static str>;

static EN: Lazy<Table> = Lazy::new(|| EN_ENTRIES.iter().copied().collect());
static AR: Lazy<Table> = Lazy::new(|| AR_ENTRIES.iter().copied().collect());

fn table(language: Language) -> &'static Table {
    match language {
        Language::En => &*EN,
        Language::Ar => &*AR,
    }
}

/// Look `key` up in the table for `language`.
pub fn lookup(language: Language, key: &str) -> Option<&'static str> {
    table(language).get(key).copied()
}

/// Translated string for `key`, or `key` itself when it is unknown.
pub fn translate<'a>(language: Language, key: &'a str) -> &'a str {
    match lookup(language, key) {
        Some(value) if !value.is_empty() => value,
        _ => key,
    }
}

/// Every key of the table for `language`
pub fn keys(language: Language) -> impl Iterator<Item = &'static str> {
    table(language).keys().copied()
}

const EN_ENTRIES: &[(&str, &str)] = &[
    // Auth screens
    ("welcomeTitle", "keepItFit"),
    ("welcomeSubtitle", "Your personal fitness companion"),
    ("welcomeDescription", "Track your activities, get personalized meal plans, and achieve your fitness goals."),
    ("getStarted", "Get Started"),
    ("logIn", "Log In"),
    ("welcomeBack", "Welcome back"),
    ("createAccount", "Create account"),
    ("email", "Email"),
    ("password", "Password"),
    ("username", "Username"),
    ("login", "Login"),
    ("loggingIn", "Logging in..."),
    ("dontHaveAccount", "Don't have an account? Sign up"),
    ("alreadyHaveAccount", "Already have an account? Log in"),
    // Profile fields
    ("accountInfo", "Account Information"),
    ("personalInfo", "Personal Information"),
    ("fitnessGoals", "Fitness Goals"),
    ("age", "Age"),
    ("weight", "Weight (kg)"),
    ("height", "Height (cm)"),
    ("goal", "Goal"),
    ("goalLose", "Lose Weight"),
    ("goalMaintain", "Maintain"),
    ("goalGain", "Gain Muscle"),
    ("dietPreference", "Diet Preference"),
    ("dietBalanced", "Balanced"),
    ("dietVegan", "Vegan"),
    ("dietKeto", "Keto"),
    ("activityLevel", "Activity Level"),
    ("activitySedentary", "Sedentary"),
    ("activityModerate", "Moderate"),
    ("activityVeryActive", "Very Active"),
    // Navigation
    ("home", "Home"),
    ("myPlan", "My Plan"),
    ("activity", "Activity"),
    ("insights", "Insights"),
    ("profile", "Profile"),
    // Home screen
    ("welcomeUser", "Welcome"),
    ("wellnessScore", "Wellness Score"),
    ("recentActivities", "Recent Activities"),
    ("noActivities", "No recent activities"),
    // Plan screen
    ("mealPlan", "Meal Plan"),
    ("workoutPlan", "Workout Plan"),
    ("breakfast", "Breakfast"),
    ("lunch", "Lunch"),
    ("dinner", "Dinner"),
    ("generatePlan", "Generate Plan"),
    ("generatingPlan", "Generating Plan..."),
    // Activity screen
    ("mealAnalyzer", "Meal Analyzer"),
    ("recipeGenerator", "Recipe Generator"),
    ("uploadImage", "Upload Image"),
    ("analyzing", "Analyzing..."),
    ("enterIngredients", "Enter available ingredients (e.g., chicken, rice, tomatoes)"),
    ("generateRecipe", "Generate Healthy Recipe"),
    ("generatingRecipe", "Generating..."),
    // Profile screen
    ("editProfile", "Edit"),
    ("save", "Save"),
    ("saving", "Saving..."),
    ("cancel", "Cancel"),
    ("signOut", "Sign Out"),
    ("changePhoto", "Change Photo"),
    ("addPhoto", "Add Photo"),
    // Common
    ("loading", "Loading..."),
    ("error", "Error"),
    ("success", "Success"),
    ("refresh", "Pull to refresh"),
    // Language
    ("language", "Language"),
    ("english", "English"),
    ("arabic", "العربية"),
];

const AR_ENTRIES: &[(&str, &str)] = &[
    // Auth screens
    ("welcomeTitle", "keepItFit"),
    ("welcomeSubtitle", "رفيقك الشخصي للياقة البدنية"),
    ("welcomeDescription", "تتبع أنشطتك، احصل على خطط وجبات مخصصة، وحقق أهداف اللياقة البدنية."),
    ("getStarted", "ابدأ الآن"),
    ("logIn", "تسجيل الدخول"),
    ("welcomeBack", "مرحباً بعودتك"),
    ("createAccount", "إنشاء حساب"),
    ("email", "البريد الإلكتروني"),
    ("password", "كلمة المرور"),
    ("username", "اسم المستخدم"),
    ("login", "تسجيل الدخول"),
    ("loggingIn", "جاري تسجيل الدخول..."),
    ("dontHaveAccount", "ليس لديك حساب؟ سجل الآن"),
    ("alreadyHaveAccount", "لديك حساب بالفعل؟ سجل الدخول"),
    // Profile fields
    ("accountInfo", "معلومات الحساب"),
    ("personalInfo", "المعلومات الشخصية"),
    ("fitnessGoals", "أهداف اللياقة البدنية"),
    ("age", "العمر"),
    ("weight", "الوزن (كجم)"),
    ("height", "الطول (سم)"),
    ("goal", "الهدف"),
    ("goalLose", "فقدان الوزن"),
    ("goalMaintain", "الحفاظ"),
    ("goalGain", "زيادة العضلات"),
    ("dietPreference", "تفضيل النظام الغذائي"),
    ("dietBalanced", "متوازن"),
    ("dietVegan", "نباتي"),
    ("dietKeto", "كيتو"),
    ("activityLevel", "مستوى النشاط"),
    ("activitySedentary", "قليل الحركة"),
    ("activityModerate", "معتدل"),
    ("activityVeryActive", "نشط جداً"),
    // Navigation
    ("home", "الرئيسية"),
    ("myPlan", "خطتي"),
    ("activity", "النشاط"),
    ("insights", "الرؤى"),
    ("profile", "الملف الشخصي"),
    // Home screen
    ("welcomeUser", "مرحباً"),
    ("wellnessScore", "درجة الصحة"),
    ("recentActivities", "الأنشطة الأخيرة"),
    ("noActivities", "لا توجد أنشطة حديثة"),
    // Plan screen
    ("mealPlan", "خطة الوجبات"),
    ("workoutPlan", "خطة التمارين"),
    ("breakfast", "الإفطار"),
    ("lunch", "الغداء"),
    ("dinner", "العشاء"),
    ("generatePlan", "إنشاء خطة"),
    ("generatingPlan", "جاري إنشاء الخطة..."),
    // Activity screen
    ("mealAnalyzer", "محلل الوجبات"),
    ("recipeGenerator", "مولد الوصفات"),
    ("uploadImage", "رفع صورة"),
    ("analyzing", "جاري التحليل..."),
    ("enterIngredients", "أدخل المكونات المتاحة (مثل: دجاج، أرز، طماطم)"),
    ("generateRecipe", "إنشاء وصفة صحية"),
    ("generatingRecipe", "جاري الإنشاء..."),
    // Profile screen
    ("editProfile", "تعديل"),
    ("save", "حفظ"),
    ("saving", "جاري الحفظ..."),
    ("cancel", "إلغاء"),
    ("signOut", "تسجيل الخروج"),
    ("changePhoto", "تغيير الصورة"),
    ("addPhoto", "إضافة صورة"),
    // Common
    ("loading", "جاري التحميل..."),
    ("error", "خطأ"),
    ("success", "نجح"),
    ("refresh", "اسحب للتحديث"),
    // Language
    ("language", "اللغة"),
    ("english", "English"),
    ("arabic", "العربية"),
];
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tables_have_same_keys() {
        let en: HashSet<_> = keys(Language::En).collect();
        let ar: HashSet<_> = keys(Language::Ar).collect();

        assert_eq!(en, ar);
        assert_eq!(en.len(), EN_ENTRIES.len(), "duplicate key in English table");
        assert_eq!(ar.len(), AR_ENTRIES.len(), "duplicate key in Arabic table");
    }

    #[test]
    fn test_every_value_is_non_empty() {
        for language in Language::ALL {
            for key in keys(language) {
                assert!(
                    !translate(language, key).is_empty(),
                    "{key} is empty for {language}"
                );
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(translate(Language::En, "signOut"), "Sign Out");
        assert_eq!(translate(Language::Ar, "signOut"), "تسجيل الخروج");
        assert_eq!(translate(Language::Ar, "welcomeTitle"), "keepItFit");
    }

    #[test]
    fn test_unknown_key_returned_unchanged() {
        assert_eq!(translate(Language::En, "notAKey"), "notAKey");
        assert_eq!(translate(Language::Ar, ""), "");
        assert_eq!(lookup(Language::En, "notAKey"), None);
    }

    #[test]
    fn test_language_labels_match_native_names() {
        for language in Language::ALL {
            assert_eq!(translate(language, "english"), Language::En.native_name());
            assert_eq!(translate(language, "arabic"), Language::Ar.native_name());
        }
    }
}
