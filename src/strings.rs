// Localized (Arabic) UI strings.

pub const TITLE: &str = "إذاعة القرآن الكريم";
pub const SUBTITLE: &str = "من مكة المكرمة - بث مباشر";
pub const PLAY: &str = "تشغيل";
pub const PAUSE: &str = "إيقاف";
pub const LIVE: &str = "مباشر الآن";
pub const BUFFERING: &str = "جاري الاتصال...";
pub const FOOTER: &str = "صدقة جارية";
pub const SHARE: &str = "مشاركة";
pub const LINK_COPIED: &str = "تم نسخ الرابط";
pub const TROUBLESHOOT: &str = "يرجى التحقق من الاتصال أو تحديث الصفحة";

pub mod errors {
    pub const GENERAL: &str = "حدث خطأ غير متوقع في البث";
    pub const NETWORK: &str = "مشكلة في الاتصال بالإنترنت";
    pub const DECODE: &str = "تعذرت معالجة ملف الصوت";
    pub const SRC_NOT_SUPPORTED: &str = "البث غير متاح حالياً";
    pub const AUTOPLAY: &str = "يرجى الضغط على زر التشغيل";
    pub const OFFLINE: &str = "لا يوجد اتصال بالإنترنت";
}
