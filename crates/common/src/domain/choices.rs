//! Closed value sets stored as stable text codes and displayed with Greek labels.

use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Storage code
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Human-readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    other => Err(DomainError::ValidationError(format!(
                        "unknown {} value: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

choice_enum! {
    Species {
        Dog => ("dog", "Σκύλος"),
        Cat => ("cat", "Γάτα"),
        Other => ("other", "Άλλο"),
    }
}

choice_enum! {
    Gender {
        Male => ("male", "Αρσενικό"),
        Female => ("female", "Θηλυκό"),
    }
}

choice_enum! {
    AgeCategory {
        Puppy => ("puppy", "Κουτάβι"),
        Senior => ("senior", "Υπερήλικο"),
    }
}

choice_enum! {
    Behavior {
        Calm => ("calm", "Ήρεμο"),
        Fearful => ("fearful", "Φοβικό"),
        Wild => ("wild", "Άγριο"),
        DangerousQuarantine => ("dangerous_quarantine", "Επικίνδυνο-Καραντίνα"),
    }
}

choice_enum! {
    VaccinationStatus {
        Vaccine1 => ("vaccine_1", "Εμβόλιο 1"),
        Vaccine2 => ("vaccine_2", "Εμβόλιο 2"),
        Vaccine3 => ("vaccine_3", "Εμβόλιο 3"),
        Vaccine4 => ("vaccine_4", "Εμβόλιο 4"),
        Vaccine5 => ("vaccine_5", "Εμβόλιο 5"),
        Vaccine6 => ("vaccine_6", "Εμβόλιο 6"),
    }
}

choice_enum! {
    SterilizationStatus {
        Yes => ("yes", "Ναι"),
        No => ("no", "Όχι"),
        Scheduled => ("scheduled", "Προγραμματισμένο"),
    }
}

choice_enum! {
    AdoptionStatus {
        Available => ("available", "Διαθέσιμο"),
        Pending => ("pending", "Εκκρεμεί"),
        Adopted => ("adopted", "Υιοθετήθηκε"),
        NotForAdoption => ("not_for_adoption", "Μη διαθέσιμο για υιοθεσία"),
    }
}

choice_enum! {
    MedicalRecordType {
        Pathology => ("pathology", "Παθήσεις"),
        Diagnosis => ("diagnosis", "Διαγνώσεις"),
    }
}

choice_enum! {
    VaccineName {
        Rabies => ("rabies", "Λύσσα"),
        Other => ("other", "Άλλο"),
    }
}

impl Default for AdoptionStatus {
    fn default() -> Self {
        AdoptionStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_str() {
        for species in Species::ALL {
            assert_eq!(species.as_str().parse::<Species>().unwrap(), *species);
        }
        for status in AdoptionStatus::ALL {
            assert_eq!(status.as_str().parse::<AdoptionStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_unknown_code_is_validation_error() {
        let result = "hamster".parse::<Species>();
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Species::Dog.label(), "Σκύλος");
        assert_eq!(Behavior::DangerousQuarantine.label(), "Επικίνδυνο-Καραντίνα");
        assert_eq!(VaccinationStatus::Vaccine4.label(), "Εμβόλιο 4");
    }

    #[test]
    fn test_serde_uses_storage_code() {
        let json = serde_json::to_string(&AdoptionStatus::NotForAdoption).unwrap();
        assert_eq!(json, "\"not_for_adoption\"");
        let parsed: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(parsed, Gender::Female);
    }
}
