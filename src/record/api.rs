//! Brew record request types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::db::EspressoRecordCreate;

/// Payload for creating a brew record.
#[derive(Debug, Deserialize, Serialize)]
pub struct EspressoRecordPost {
    pub coffee: f64,
    pub water: f64,
    #[serde(default)]
    pub beans_brand: String,
    #[serde(default)]
    pub grind_size: f64,
    #[serde(default)]
    pub taste_notes: String,
    #[serde(default)]
    pub picture: String,
}

impl EspressoRecordPost {
    /// Binds the record to its owner and computes the water-to-coffee ratio.
    pub fn into_create(self, owner: Uuid) -> EspressoRecordCreate {
        let ratio = if self.coffee > 0.0 {
            self.water / self.coffee
        } else {
            0.0
        };
        EspressoRecordCreate {
            user_id: owner,
            coffee: self.coffee,
            water: self.water,
            ratio,
            beans_brand: self.beans_brand,
            grind_size: self.grind_size,
            taste_notes: self.taste_notes,
            picture: self.picture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(coffee: f64, water: f64) -> EspressoRecordPost {
        EspressoRecordPost {
            coffee,
            water,
            beans_brand: String::new(),
            grind_size: 0.0,
            taste_notes: String::new(),
            picture: String::new(),
        }
    }

    #[test]
    fn ratio_is_water_over_coffee() {
        let create = post(18.0, 36.0).into_create(Uuid::new_v4());
        assert_eq!(create.ratio, 2.0);
    }

    #[test]
    fn zero_coffee_does_not_divide() {
        let create = post(0.0, 36.0).into_create(Uuid::new_v4());
        assert_eq!(create.ratio, 0.0);
    }
}
