//! Built-in reference data.

use chrono::Weekday;

use crate::models::{ConsultationType, Money, Practitioner, TimeSlot};

use super::StaticCatalog;

impl StaticCatalog {
    /// The default catalog: five consultation types, three practitioners.
    pub fn builtin() -> Self {
        Self {
            consultation_types: builtin_consultation_types(),
            practitioners: builtin_practitioners(),
        }
    }
}

fn consultation(
    id: &str,
    name: &str,
    duration: &str,
    price_range: &str,
    standard_price: u64,
    description: &str,
    icon: &str,
) -> ConsultationType {
    ConsultationType {
        id: id.into(),
        name: name.into(),
        duration_range: duration.into(),
        price_range: price_range.into(),
        standard_price: Money::from_dollars(standard_price),
        short_description: description.into(),
        icon: icon.into(),
    }
}

fn slots(times: &[(u32, u32)]) -> Vec<TimeSlot> {
    times.iter().filter_map(|&(h, m)| TimeSlot::new(h, m)).collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn builtin_consultation_types() -> Vec<ConsultationType> {
    vec![
        consultation(
            "initial",
            "Initial Ayurvedic Consultation",
            "60-90 minutes",
            "$150-200",
            175,
            "Constitution assessment, pulse diagnosis and a personalised plan",
            "leaf",
        ),
        consultation(
            "comprehensive",
            "Comprehensive Health Assessment",
            "90-120 minutes",
            "$225-275",
            250,
            "In-depth review of history, dosha balance and lifestyle",
            "clipboard",
        ),
        consultation(
            "follow-up",
            "Follow-up Consultation",
            "30-45 minutes",
            "$75-100",
            90,
            "Progress review and plan adjustments",
            "repeat",
        ),
        consultation(
            "dosha-analysis",
            "Dosha Analysis",
            "45-60 minutes",
            "$100-150",
            125,
            "Focused Vata, Pitta and Kapha evaluation",
            "balance",
        ),
        consultation(
            "nutrition",
            "Nutritional Counseling",
            "45-60 minutes",
            "$95-130",
            110,
            "Diet and seasonal eating guidance",
            "bowl",
        ),
    ]
}

pub fn builtin_practitioners() -> Vec<Practitioner> {
    vec![
        Practitioner {
            id: "sarah-patel".into(),
            name: "Dr. Sarah Patel".into(),
            credentials: "BAMS, MD (Ayurveda)".into(),
            experience: "15+ years".into(),
            rating: 4.9,
            reviews: 127,
            specializations: strings(&["Digestive Health", "Women's Health", "Stress Management"]),
            languages: strings(&["English", "Hindi", "Gujarati"]),
            available_weekdays: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            time_slots: slots(&[(9, 0), (10, 30), (13, 0), (14, 30), (16, 0)]),
        },
        Practitioner {
            id: "michael-chen".into(),
            name: "Dr. Michael Chen".into(),
            credentials: "MS, Certified Ayurvedic Practitioner".into(),
            experience: "10+ years".into(),
            rating: 4.8,
            reviews: 94,
            specializations: strings(&["Pain Management", "Sleep Disorders", "Detoxification"]),
            languages: strings(&["English", "Mandarin"]),
            available_weekdays: vec![Weekday::Tue, Weekday::Thu, Weekday::Sat],
            time_slots: slots(&[(10, 0), (11, 30), (14, 0), (15, 30)]),
        },
        Practitioner {
            id: "priya-sharma".into(),
            name: "Dr. Priya Sharma".into(),
            credentials: "BAMS, PhD".into(),
            experience: "12+ years".into(),
            rating: 4.9,
            reviews: 112,
            specializations: strings(&["Skin Conditions", "Respiratory Health", "Panchakarma"]),
            languages: strings(&["English", "Hindi", "Marathi"]),
            available_weekdays: vec![Weekday::Mon, Weekday::Tue, Weekday::Thu, Weekday::Fri],
            time_slots: slots(&[(8, 30), (10, 0), (13, 30), (15, 0), (17, 0)]),
        },
    ]
}
