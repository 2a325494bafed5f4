use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseGenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("male") {
            Ok(Gender::Male)
        } else if trimmed.eq_ignore_ascii_case("female") {
            Ok(Gender::Female)
        } else {
            Err(ParseGenderError(trimmed.to_string()))
        }
    }
}

/// Form inputs in the order the validator checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Gender,
    Waist,
    Height,
    Weight,
    Age,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Gender,
        FormField::Waist,
        FormField::Height,
        FormField::Weight,
        FormField::Age,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::Gender => "gender",
            FormField::Waist => "waist",
            FormField::Height => "height",
            FormField::Weight => "weight",
            FormField::Age => "age",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("Male".parse::<Gender>().expect("male"), Gender::Male);
        assert_eq!(" FEMALE ".parse::<Gender>().expect("female"), Gender::Female);
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn gender_serializes_lowercase() {
        let json = serde_json::to_string(&Gender::Female).expect("serialize");
        assert_eq!(json, "\"female\"");
    }
}
