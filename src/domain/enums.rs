//! Enumerations persisted and exchanged by name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        DomainError::Corrupt(format!(
                            "'{}' is not a valid {}",
                            s,
                            stringify!($name)
                        ))
                    })
            }
        }
    };
}

named_enum!(
    /// Role of an account.
    UserType { Student, Teacher }
);

named_enum!(Gender {
    Undefined,
    Male,
    Female,
    Other
});

named_enum!(HeightUnit { Centimeters, Inches });

named_enum!(WeightUnit { Kilograms, Pounds });

named_enum!(DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday
});

named_enum!(
    /// Muscle group filter accepted by the exercise query.
    MuscleGroupParam {
        Abductors,
        Adductors,
        Back,
        Biceps,
        Calves,
        Chest,
        Core,
        Forearms,
        Glutes,
        Hamstrings,
        Neck,
        Quads,
        Shoulders,
        Traps,
        Triceps,
    }
);

impl MuscleGroupParam {
    /// Stable numeric code; clients may send either the code or the name.
    pub fn code(self) -> u16 {
        let position = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        (position as u16 + 1) * 10
    }

    /// Parses a query value given as a name ("chest") or as a code ("60").
    pub fn parse(value: &str) -> Option<Self> {
        if let Ok(code) = value.trim().parse::<u16>() {
            return Self::ALL.iter().copied().find(|p| p.code() == code);
        }
        value.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_case_insensitively() {
        assert_eq!("kilograms".parse::<WeightUnit>().unwrap(), WeightUnit::Kilograms);
        assert_eq!(DayOfWeek::Friday.as_str(), "Friday");
        assert!("Stone".parse::<WeightUnit>().is_err());
    }

    #[test]
    fn muscle_group_param_accepts_codes_and_names() {
        assert_eq!(MuscleGroupParam::Abductors.code(), 10);
        assert_eq!(MuscleGroupParam::Triceps.code(), 150);
        assert_eq!(MuscleGroupParam::parse("60"), Some(MuscleGroupParam::Chest));
        assert_eq!(MuscleGroupParam::parse("quads"), Some(MuscleGroupParam::Quads));
        assert_eq!(MuscleGroupParam::parse("65"), None);
        assert_eq!(MuscleGroupParam::parse("wings"), None);
    }
}
