//! Tiered sleep advice selected from a risk result.
//!
//! Copy lives in one static table keyed by (language, tier); selection is the
//! only logic here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::assessment::{RiskLabel, RiskResult};

/// Display language for canned copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    Indonesian,
}

impl Language {
    /// ISO 639-1 code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Indonesian => "id",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::English => 0,
            Self::Indonesian => 1,
        }
    }

    /// Localized name of a predicted class.
    #[must_use]
    pub fn label_text(&self, label: RiskLabel) -> &'static str {
        match (self, label) {
            (Self::English, RiskLabel::Insomnia) => "INSOMNIA RISK DETECTED",
            (Self::English, RiskLabel::Normal) => "NO INSOMNIA RISK",
            (Self::Indonesian, RiskLabel::Insomnia) => "RISIKO INSOMNIA TERDETEKSI",
            (Self::Indonesian, RiskLabel::Normal) => "TIDAK ADA RISIKO INSOMNIA",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "id" | "indonesian" | "bahasa" => Ok(Self::Indonesian),
            other => Err(format!("Unsupported language '{other}' (expected en or id)")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Advice tier. Three per predicted class, chosen by that class's probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdviceTier {
    /// Insomnia, p >= 0.80
    HighRisk,
    /// Insomnia, 0.60 <= p < 0.80
    ModerateRisk,
    /// Insomnia, p < 0.60
    LowRisk,
    /// Normal, p >= 0.90
    Excellent,
    /// Normal, 0.70 <= p < 0.90
    Good,
    /// Normal, p < 0.70
    Fair,
}

impl AdviceTier {
    /// Select the tier by the probability of the predicted class.
    #[must_use]
    pub fn select(result: &RiskResult) -> Self {
        match result.label {
            RiskLabel::Insomnia => {
                let p = result.probabilities.insomnia;
                if p >= 0.80 {
                    Self::HighRisk
                } else if p >= 0.60 {
                    Self::ModerateRisk
                } else {
                    Self::LowRisk
                }
            }
            RiskLabel::Normal => {
                let p = result.probabilities.normal;
                if p >= 0.90 {
                    Self::Excellent
                } else if p >= 0.70 {
                    Self::Good
                } else {
                    Self::Fair
                }
            }
        }
    }

    fn index(self) -> usize {
        match self {
            Self::HighRisk => 0,
            Self::ModerateRisk => 1,
            Self::LowRisk => 2,
            Self::Excellent => 3,
            Self::Good => 4,
            Self::Fair => 5,
        }
    }
}

struct AdviceCopy {
    badge: &'static str,
    title: &'static str,
    items: &'static [&'static str],
}

const ADVICE: [[AdviceCopy; 6]; 2] = [
    [
        AdviceCopy {
            badge: "HIGH RISK",
            title: "See a specialist soon",
            items: &[
                "TOP PRIORITY: consult a doctor or sleep-disorder specialist as soon as possible",
                "Practice intensive relaxation (meditation, yoga, breathing exercises)",
                "Avoid caffeine, alcohol and nicotine entirely",
                "Keep a strict, consistent sleep schedule",
                "Make the bedroom dark, cool and quiet",
                "Consider cognitive behavioral therapy for insomnia (CBT-I)",
            ],
        },
        AdviceCopy {
            badge: "MODERATE RISK",
            title: "Needs attention",
            items: &[
                "Consult a health professional in the near future",
                "Do relaxation exercises before bed every night",
                "Avoid caffeine and alcohol for at least 6 hours before sleep",
                "Keep a consistent sleep schedule",
                "Make your sleep environment comfortable",
                "Do light physical activity in the morning or afternoon",
            ],
        },
        AdviceCopy {
            badge: "LOW RISK",
            title: "Stay alert",
            items: &[
                "Monitor your sleep pattern regularly",
                "Try light relaxation techniques before bed",
                "Avoid caffeine in the afternoon and evening",
                "Keep a regular sleep schedule",
                "Build a comfortable bedtime routine",
            ],
        },
        AdviceCopy {
            badge: "EXCELLENT SLEEP",
            title: "Keep this pattern",
            items: &[
                "Continue your healthy sleep routine",
                "Keep your sleep schedule consistent",
                "Stay physically active",
                "Keep managing stress well",
                "Avoid drastic changes to your sleep pattern",
            ],
        },
        AdviceCopy {
            badge: "GOOD SLEEP",
            title: "Keep optimizing",
            items: &[
                "Keep a regular sleep schedule",
                "Stay physically active",
                "Keep managing stress well",
                "Avoid screens before bed",
                "Eat a healthy, balanced diet",
            ],
        },
        AdviceCopy {
            badge: "FAIR SLEEP",
            title: "Small improvements needed",
            items: &[
                "Make your sleep schedule more consistent",
                "Stay physically active",
                "Manage stress more effectively",
                "Avoid screens before bed",
                "Eat a healthy, balanced diet",
                "Consider light relaxation techniques",
            ],
        },
    ],
    [
        AdviceCopy {
            badge: "RISIKO TINGGI",
            title: "Segera Konsultasi Ahli",
            items: &[
                "PRIORITAS UTAMA: segera konsultasikan dengan ahli kesehatan atau spesialis gangguan tidur",
                "Terapkan teknik relaksasi intensif (meditasi, yoga, latihan pernapasan)",
                "Hindari kafein, alkohol, dan nikotin sepenuhnya",
                "Buat jadwal tidur yang sangat ketat dan konsisten",
                "Ciptakan lingkungan tidur yang optimal (gelap, sejuk, tenang)",
                "Pertimbangkan terapi kognitif perilaku untuk insomnia (CBT-I)",
            ],
        },
        AdviceCopy {
            badge: "RISIKO SEDANG",
            title: "Perlu Perhatian Khusus",
            items: &[
                "Konsultasikan dengan ahli kesehatan dalam waktu dekat",
                "Terapkan teknik relaksasi sebelum tidur secara rutin",
                "Hindari kafein dan alkohol minimal 6 jam sebelum tidur",
                "Buat jadwal tidur yang konsisten",
                "Ciptakan lingkungan tidur yang nyaman",
                "Lakukan aktivitas fisik ringan di pagi atau siang hari",
            ],
        },
        AdviceCopy {
            badge: "RISIKO RENDAH",
            title: "Tetap Waspada",
            items: &[
                "Pantau pola tidur Anda secara rutin",
                "Terapkan teknik relaksasi ringan sebelum tidur",
                "Hindari kafein di sore atau malam hari",
                "Pertahankan jadwal tidur yang teratur",
                "Ciptakan rutinitas tidur yang nyaman",
            ],
        },
        AdviceCopy {
            badge: "KUALITAS TIDUR SANGAT BAIK",
            title: "Pertahankan Pola Ini",
            items: &[
                "Lanjutkan rutinitas tidur yang sudah baik",
                "Pertahankan jadwal tidur yang konsisten",
                "Lakukan aktivitas fisik secara rutin",
                "Kelola stres dengan baik",
                "Hindari perubahan drastis pada pola tidur",
            ],
        },
        AdviceCopy {
            badge: "KUALITAS TIDUR BAIK",
            title: "Tetap Optimalkan",
            items: &[
                "Pertahankan jadwal tidur yang teratur",
                "Lakukan aktivitas fisik secara rutin",
                "Kelola stres dengan baik",
                "Hindari penggunaan gawai sebelum tidur",
                "Konsumsi makanan sehat dan seimbang",
            ],
        },
        AdviceCopy {
            badge: "KUALITAS TIDUR CUKUP",
            title: "Perlu Perbaikan Ringan",
            items: &[
                "Tingkatkan konsistensi jadwal tidur",
                "Lakukan aktivitas fisik secara rutin",
                "Kelola stres dengan lebih baik",
                "Hindari penggunaan gawai sebelum tidur",
                "Konsumsi makanan sehat dan seimbang",
                "Pertimbangkan teknik relaksasi ringan",
            ],
        },
    ],
];

/// Rendered advice for one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tier: AdviceTier,
    pub language: Language,
    /// e.g. "HIGH RISK (90.0%) - See a specialist soon"
    pub headline: String,
    /// One-sentence summary of the prediction
    pub summary: String,
    /// Both class probabilities, e.g. "Normal probability = 90.0%, ..."
    pub explanation: String,
    pub items: &'static [&'static str],
}

impl Recommendation {
    /// Select and render advice for `result` in `language`.
    #[must_use]
    pub fn for_result(result: &RiskResult, language: Language) -> Self {
        let tier = AdviceTier::select(result);
        let copy = &ADVICE[language.index()][tier.index()];
        let percent = result.confidence() * 100.0;

        let summary = match (language, result.label) {
            (Language::English, RiskLabel::Insomnia) => format!(
                "The assessment estimates you are at risk of insomnia with {percent:.1}% confidence."
            ),
            (Language::English, RiskLabel::Normal) => format!(
                "The assessment estimates you are not at risk of insomnia with {percent:.1}% confidence."
            ),
            (Language::Indonesian, RiskLabel::Insomnia) => format!(
                "Model memperkirakan kamu berisiko insomnia dengan tingkat keyakinan {percent:.1}%."
            ),
            (Language::Indonesian, RiskLabel::Normal) => format!(
                "Model memperkirakan kamu tidak berisiko insomnia dengan tingkat keyakinan {percent:.1}%."
            ),
        };

        let normal = result.probabilities.normal * 100.0;
        let insomnia = result.probabilities.insomnia * 100.0;
        let explanation = match language {
            Language::English => format!(
                "Normal probability = {normal:.1}%, Insomnia probability = {insomnia:.1}%"
            ),
            Language::Indonesian => format!(
                "Probabilitas normal = {normal:.1}%, probabilitas insomnia = {insomnia:.1}%"
            ),
        };

        Self {
            tier,
            language,
            explanation,
            headline: format!("{} ({percent:.1}%) - {}", copy.badge, copy.title),
            summary,
            items: copy.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::Probabilities;

    fn result(label: RiskLabel, insomnia: f64) -> RiskResult {
        RiskResult {
            label,
            probabilities: Probabilities::from_insomnia(insomnia),
        }
    }

    #[test]
    fn test_insomnia_tiers() {
        assert_eq!(AdviceTier::select(&result(RiskLabel::Insomnia, 0.90)), AdviceTier::HighRisk);
        assert_eq!(AdviceTier::select(&result(RiskLabel::Insomnia, 0.80)), AdviceTier::HighRisk);
        assert_eq!(AdviceTier::select(&result(RiskLabel::Insomnia, 0.75)), AdviceTier::ModerateRisk);
        assert_eq!(AdviceTier::select(&result(RiskLabel::Insomnia, 0.60)), AdviceTier::ModerateRisk);
        assert_eq!(AdviceTier::select(&result(RiskLabel::Insomnia, 0.45)), AdviceTier::LowRisk);
    }

    #[test]
    fn test_normal_tiers_use_normal_probability() {
        let excellent = RiskResult {
            label: RiskLabel::Normal,
            probabilities: Probabilities { normal: 0.90, insomnia: 0.10 },
        };
        let good = RiskResult {
            label: RiskLabel::Normal,
            probabilities: Probabilities { normal: 0.70, insomnia: 0.30 },
        };
        let fair = RiskResult {
            label: RiskLabel::Normal,
            probabilities: Probabilities { normal: 0.65, insomnia: 0.35 },
        };

        assert_eq!(AdviceTier::select(&excellent), AdviceTier::Excellent);
        assert_eq!(AdviceTier::select(&good), AdviceTier::Good);
        assert_eq!(AdviceTier::select(&fair), AdviceTier::Fair);
    }

    #[test]
    fn test_rule_table_tiers() {
        let tiers: Vec<AdviceTier> = (0..=6u8)
            .map(|s| AdviceTier::select(&RiskResult::from_score(s)))
            .collect();
        assert_eq!(
            tiers,
            vec![
                AdviceTier::Excellent,
                AdviceTier::Good,
                AdviceTier::Good,
                AdviceTier::LowRisk,
                AdviceTier::ModerateRisk,
                AdviceTier::ModerateRisk,
                AdviceTier::HighRisk,
            ]
        );
    }

    #[test]
    fn test_recommendation_copy() {
        let rec = Recommendation::for_result(&RiskResult::from_score(8), Language::English);
        assert_eq!(rec.tier, AdviceTier::HighRisk);
        assert_eq!(rec.headline, "HIGH RISK (90.0%) - See a specialist soon");
        assert!(!rec.items.is_empty());
        assert_eq!(
            rec.explanation,
            "Normal probability = 10.0%, Insomnia probability = 90.0%"
        );

        let id = Recommendation::for_result(&RiskResult::from_score(0), Language::Indonesian);
        assert_eq!(id.headline, "KUALITAS TIDUR SANGAT BAIK (90.0%) - Pertahankan Pola Ini");
        assert!(id.summary.contains("tidak berisiko"));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("ID".parse::<Language>(), Ok(Language::Indonesian));
        assert_eq!("english".parse::<Language>(), Ok(Language::English));
        assert!("fr".parse::<Language>().is_err());
    }
}
