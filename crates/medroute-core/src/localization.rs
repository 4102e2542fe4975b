//! Georgian user-facing strings shared across pipelines.

pub const DISCLAIMER_DEFAULT: &str = "⚕️ მედგზური არ ანაცვლებს ექიმის კონსულტაციას.";

pub const DISCLAIMER_RESEARCH: &str = "⚕️ მედგზური არ ანაცვლებს ექიმის კონსულტაციას. \
წარმოდგენილი ინფორმაცია განკუთვნილია საინფორმაციო მიზნებისთვის.";

pub const DISCLAIMER_SYMPTOMS: &str = "⚕️ ეს არ არის დიაგნოზი. მედგზური არ ანაცვლებს \
ექიმის კონსულტაციას. წარმოდგენილი ინფორმაცია განკუთვნილია საინფორმაციო მიზნებისთვის.";

pub const DISCLAIMER_CLINICS: &str = "⚕️ ფასები საინფორმაციო ხასიათისაა და შეიძლება \
განსხვავდებოდეს. მედგზური არ ანაცვლებს ექიმის კონსულტაციას.";

pub const DISCLAIMER_REPORT: &str = "ეს ანგარიში არ ჩაანაცვლებს ექიმის კონსულტაციას.";

pub const DISCLAIMER_NOT_DIAGNOSIS: &str =
    "ეს არ არის დიაგნოზი — მხოლოდ საინფორმაციო მიმოხილვა";

pub const ERR_UNKNOWN_TYPE: &str = "არასწორი მოთხოვნის ტიპი.";
pub const ERR_MISSING_DIAGNOSIS: &str =
    "გთხოვთ მიუთითოთ დიაგნოზი ან სამედიცინო მდგომარეობა.";
pub const ERR_MISSING_SYMPTOMS: &str = "გთხოვთ აღწეროთ სიმპტომები.";
pub const ERR_MISSING_TREATMENT: &str = "გთხოვთ მიუთითოთ დიაგნოზი ან მკურნალობის ტიპი.";
pub const ERR_MISSING_SEARCH_RESULT: &str =
    "ძიების შედეგები არ მოიძებნა ანგარიშის გენერაციისთვის.";

pub const ERR_NO_RESEARCH_RESULTS: &str =
    "კვლევები ვერ მოიძებნა. გთხოვთ სცადოთ სხვა საძიებო ტერმინი.";
pub const ERR_NO_CLINICS: &str =
    "კლინიკები ვერ მოიძებნა. გთხოვთ სცადოთ სხვა საძიებო ტერმინი.";
pub const ERR_SYMPTOM_ANALYSIS: &str = "სიმპტომების ანალიზი ვერ მოხერხდა.";
pub const ERR_REPORT_GENERATION: &str = "ანგარიშის გენერაცია ვერ მოხერხდა.";
