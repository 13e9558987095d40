//! Registration import: player records from CSV.
//!
//! Expected headers: `id,name,division,buddy_id,coach_id,assistant_coach_id,skill_rating`.
//! Empty optional cells become `None`; an empty skill rating is 0.

use crate::logic::validation::validate_players;
use crate::models::{Player, SchedulerError};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    id: String,
    #[serde(default)]
    name: String,
    division: String,
    #[serde(default)]
    buddy_id: Option<String>,
    #[serde(default)]
    coach_id: Option<String>,
    #[serde(default)]
    assistant_coach_id: Option<String>,
    #[serde(default)]
    skill_rating: Option<f64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<PlayerRecord> for Player {
    fn from(r: PlayerRecord) -> Self {
        Player {
            id: r.id.trim().to_string(),
            name: r.name.trim().to_string(),
            division: r.division.trim().to_string(),
            buddy_id: non_empty(r.buddy_id),
            coach_id: non_empty(r.coach_id),
            assistant_coach_id: non_empty(r.assistant_coach_id),
            skill_rating: r.skill_rating.unwrap_or(0.0),
        }
    }
}

/// Read and validate players from CSV with a header row.
pub fn players_from_csv<R: Read>(reader: R) -> Result<Vec<Player>, SchedulerError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut players = Vec::new();
    for record in rdr.deserialize::<PlayerRecord>() {
        players.push(Player::from(record?));
    }
    validate_players(&players)?;
    log::info!("Imported {} player registration(s)", players.len());
    Ok(players)
}
