//! Turns the live field snapshot into a request-ready input.

use std::ops::RangeInclusive;

use shared::{
    domain::{FormField, Gender},
    protocol::PredictionRequest,
};
use thiserror::Error;

use crate::surface::UiSurface;

pub const WAIST_RANGE_CM: RangeInclusive<f64> = 50.0..=200.0;
pub const HEIGHT_RANGE_CM: RangeInclusive<f64> = 100.0..=250.0;
pub const WEIGHT_RANGE_KG: RangeInclusive<f64> = 30.0..=200.0;
pub const AGE_RANGE_YEARS: RangeInclusive<i64> = 18..=100;

/// Values as read from the form on one submission attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub gender: Option<Gender>,
    pub waist: Option<f64>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<i64>,
}

impl FormInput {
    pub fn from_surface(surface: &dyn UiSurface) -> Self {
        Self {
            gender: surface
                .selected_gender()
                .and_then(|raw| raw.parse::<Gender>().ok()),
            waist: parse_decimal(&surface.field_value(FormField::Waist)),
            height: parse_decimal(&surface.field_value(FormField::Height)),
            weight: parse_decimal(&surface.field_value(FormField::Weight)),
            age: parse_whole(&surface.field_value(FormField::Age)),
        }
    }

    fn missing_fields(&self) -> Vec<FormField> {
        let mut missing = Vec::new();
        if self.gender.is_none() {
            missing.push(FormField::Gender);
        }
        if self.waist.is_none() {
            missing.push(FormField::Waist);
        }
        if self.height.is_none() {
            missing.push(FormField::Height);
        }
        if self.weight.is_none() {
            missing.push(FormField::Weight);
        }
        if self.age.is_none() {
            missing.push(FormField::Age);
        }
        missing
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_whole(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    parse_decimal(trimmed).map(|value| value.trunc() as i64)
}

/// Input that passed every range check. Only [`validate`] builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    gender: Gender,
    waist: f64,
    height: f64,
    weight: f64,
    age: i64,
}

impl ValidatedInput {
    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn waist(&self) -> f64 {
        self.waist
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn age(&self) -> i64 {
        self.age
    }

    pub fn to_request(&self) -> PredictionRequest {
        PredictionRequest {
            gender: self.gender,
            waist: self.waist,
            height: self.height,
            weight: self.weight,
            age: self.age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("请填写所有必填项")]
    Missing { fields: Vec<FormField> },
    #[error("腰围应在50-200cm之间")]
    WaistOutOfRange(f64),
    #[error("身高应在100-250cm之间")]
    HeightOutOfRange(f64),
    #[error("体重应在30-200kg之间")]
    WeightOutOfRange(f64),
    #[error("年龄应在18-100岁之间")]
    AgeOutOfRange(i64),
}

impl ValidationError {
    /// Fields that get the invalid marker.
    pub fn fields(&self) -> Vec<FormField> {
        match self {
            ValidationError::Missing { fields } => fields.clone(),
            ValidationError::WaistOutOfRange(_) => vec![FormField::Waist],
            ValidationError::HeightOutOfRange(_) => vec![FormField::Height],
            ValidationError::WeightOutOfRange(_) => vec![FormField::Weight],
            ValidationError::AgeOutOfRange(_) => vec![FormField::Age],
        }
    }
}

/// Checks presence, then waist, height, weight and age, stopping at the first failure.
pub fn validate(input: &FormInput) -> Result<ValidatedInput, ValidationError> {
    let (Some(gender), Some(waist), Some(height), Some(weight), Some(age)) =
        (input.gender, input.waist, input.height, input.weight, input.age)
    else {
        return Err(ValidationError::Missing {
            fields: input.missing_fields(),
        });
    };

    if !WAIST_RANGE_CM.contains(&waist) {
        return Err(ValidationError::WaistOutOfRange(waist));
    }
    if !HEIGHT_RANGE_CM.contains(&height) {
        return Err(ValidationError::HeightOutOfRange(height));
    }
    if !WEIGHT_RANGE_KG.contains(&weight) {
        return Err(ValidationError::WeightOutOfRange(weight));
    }
    if !AGE_RANGE_YEARS.contains(&age) {
        return Err(ValidationError::AgeOutOfRange(age));
    }

    Ok(ValidatedInput {
        gender,
        waist,
        height,
        weight,
        age,
    })
}

#[cfg(test)]
#[path = "tests/validator_tests.rs"]
mod tests;
