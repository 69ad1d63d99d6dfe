use chrono::NaiveDate;
use model_store::Model;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "games")]
pub struct Game {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub release_date: Option<NaiveDate>,
}

impl Game {
    pub fn new(id: &str, name: &str, platform: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            platform: platform.to_string(),
            release_date: None,
        }
    }

    pub fn released(mut self, year: i32, month: u32, day: u32) -> Self {
        self.release_date = NaiveDate::from_ymd_opt(year, month, day);
        self
    }
}

/// Shares identifiers with `Game` but lives in its own collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
#[model(collection = "consoles")]
pub struct Console {
    pub id: String,
    pub maker: String,
}

/// Identified by a generated token; collection defaults to `save_slots`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Model)]
pub struct SaveSlot {
    #[model(id)]
    pub token: Uuid,
    pub game_id: String,
    pub progress: u8,
}

impl SaveSlot {
    pub fn new(game_id: &str, progress: u8) -> Self {
        Self {
            token: Uuid::new_v4(),
            game_id: game_id.to_string(),
            progress,
        }
    }
}
