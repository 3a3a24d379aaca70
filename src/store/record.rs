//! On-disk JSON shapes for tournaments and their conversion to and from the models.

use crate::logic::recompute_scores;
use crate::models::{
    GameMatch, Outcome, Player, PlayerIndex, Round, RoundStatus, Standing, Tournament,
    TournamentDetails, TournamentStatus,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const UNPLAYED: &str = "Non joué";

/// Tournament details as listed in the directory index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub index: usize,
    #[serde(rename = "nom_tournoi")]
    pub name: String,
    #[serde(rename = "date_debut")]
    pub start_date: NaiveDate,
    #[serde(rename = "date_fin")]
    pub end_date: NaiveDate,
    #[serde(rename = "nb_rondes")]
    pub round_count: u32,
    #[serde(rename = "nb_max_joueurs")]
    pub max_players: usize,
    #[serde(rename = "type_tournoi")]
    pub format: String,
}

impl BaseRecord {
    pub fn from_tournament(t: &Tournament) -> Self {
        let d = &t.details;
        Self {
            index: t.index,
            name: d.name.clone(),
            start_date: d.start_date,
            end_date: d.end_date,
            round_count: d.round_count,
            max_players: d.max_players,
            format: d.format.clone(),
        }
    }

    pub fn details(&self) -> TournamentDetails {
        TournamentDetails {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            max_players: self.max_players,
            round_count: self.round_count,
            format: self.format.clone(),
        }
    }
}

/// Full tournament file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    #[serde(flatten)]
    pub base: BaseRecord,
    #[serde(rename = "nb_inscrits", default)]
    pub enrolled_count: usize,
    #[serde(rename = "statut", default = "pending_label")]
    pub status: String,
    #[serde(rename = "joueurs_inscrits", default)]
    pub players: Vec<PlayerIndex>,
    #[serde(rename = "rondes", default)]
    pub rounds: Vec<RoundRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    #[serde(rename = "numero")]
    pub number: u32,
    #[serde(rename = "date")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "statut")]
    pub status: String,
    #[serde(rename = "matchs", default)]
    pub matches: Vec<MatchRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bye: Option<PlayerIndex>,
    #[serde(rename = "classement_apres_ronde", default)]
    pub standings: Vec<StandingRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// "White Name - Black Name"
    #[serde(rename = "match")]
    pub label: String,
    #[serde(rename = "blanc", default)]
    pub white: Option<PlayerIndex>,
    #[serde(rename = "noir", default)]
    pub black: Option<PlayerIndex>,
    /// Outcome code, or "Non joué".
    pub score: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandingRecord {
    #[serde(rename = "joueur")]
    pub player: PlayerIndex,
    pub points: f64,
}

fn pending_label() -> String {
    tournament_status_label(TournamentStatus::Pending).to_string()
}

fn tournament_status_label(status: TournamentStatus) -> &'static str {
    match status {
        TournamentStatus::Pending => "En attente",
        TournamentStatus::InProgress => "En cours",
        TournamentStatus::Completed => "Terminé",
    }
}

fn parse_tournament_status(label: &str) -> TournamentStatus {
    match label {
        "En cours" => TournamentStatus::InProgress,
        "Terminé" => TournamentStatus::Completed,
        "En attente" => TournamentStatus::Pending,
        other => {
            log::warn!("Unknown tournament status '{}', using pending", other);
            TournamentStatus::Pending
        }
    }
}

fn round_status_label(status: RoundStatus) -> &'static str {
    match status {
        RoundStatus::InProgress => "en cours",
        RoundStatus::Completed => "terminée",
    }
}

fn parse_round_status(label: &str) -> RoundStatus {
    match label {
        "terminée" => RoundStatus::Completed,
        _ => RoundStatus::InProgress,
    }
}

impl TournamentRecord {
    pub fn from_tournament(t: &Tournament) -> Self {
        let label = |index: PlayerIndex| {
            t.get_player(index)
                .map(Player::full_name)
                .unwrap_or_else(|| index.to_string())
        };
        let rounds = t
            .rounds()
            .iter()
            .map(|r| RoundRecord {
                number: r.number,
                created_at: r.created_at,
                status: round_status_label(r.status).to_string(),
                matches: r
                    .matches
                    .iter()
                    .map(|m| MatchRecord {
                        label: format!("{} - {}", label(m.white), label(m.black)),
                        white: Some(m.white),
                        black: Some(m.black),
                        score: m
                            .outcome
                            .map(Outcome::code)
                            .unwrap_or(UNPLAYED)
                            .to_string(),
                    })
                    .collect(),
                bye: r.bye,
                standings: r
                    .standings
                    .iter()
                    .map(|s| StandingRecord {
                        player: s.player,
                        points: s.points,
                    })
                    .collect(),
            })
            .collect();

        Self {
            base: BaseRecord::from_tournament(t),
            enrolled_count: t.players().len(),
            status: tournament_status_label(t.status).to_string(),
            players: t.players().iter().map(|p| p.index).collect(),
            rounds,
        }
    }

    /// Rebuild the tournament. `roster` holds the stored player records; only
    /// those listed in `joueurs_inscrits` are enrolled, in that order. Rounds
    /// are ordered by stored number and renumbered from 1. Scores are
    /// replayed from the match history.
    pub fn into_tournament(self, roster: Vec<Player>) -> Tournament {
        let name = self.base.name.clone();
        let mut t = Tournament::new(self.base.index, self.base.details());
        t.status = parse_tournament_status(&self.status);

        for index in &self.players {
            match roster.iter().find(|p| p.index == *index) {
                Some(p) => {
                    let mut p = p.clone();
                    p.score = 0.0;
                    t.players.push(p);
                }
                None => log::warn!("{}: enrolled player {} has no record", name, index),
            }
        }

        let mut rounds = self.rounds;
        rounds.sort_by_key(|r| r.number);
        if rounds.len() > t.details.round_count as usize {
            log::warn!(
                "{}: file holds {} rounds but the tournament has {}",
                name,
                rounds.len(),
                t.details.round_count
            );
        }

        for (number, r) in (1..).zip(rounds) {
            if r.number != number {
                log::warn!("{}: round {} renumbered to {}", name, r.number, number);
            }
            let matches = r
                .matches
                .iter()
                .filter_map(|m| match resolve_match(&t.players, m) {
                    Some(gm) => Some(gm),
                    None => {
                        log::warn!("{}: dropping unresolvable match '{}'", name, m.label);
                        None
                    }
                })
                .collect();
            let mut round = Round::new(number, r.created_at, matches);
            round.status = parse_round_status(&r.status);
            round.bye = r.bye;
            round.standings = r
                .standings
                .iter()
                .map(|s| Standing {
                    player: s.player,
                    points: s.points,
                })
                .collect();
            if round.is_completed() && round.standings.is_empty() {
                round.standings = round.local_standings();
            }
            t.rounds.push(round);
        }

        recompute_scores(&mut t);
        t
    }
}

/// Find both players of a stored match, by index when present, otherwise by
/// the "White - Black" label.
fn resolve_match(players: &[Player], m: &MatchRecord) -> Option<GameMatch> {
    let (white_label, black_label) = m
        .label
        .split_once(" - ")
        .map(|(w, b)| (w.trim(), b.trim()))
        .unwrap_or_default();
    let find = |index: Option<PlayerIndex>, label: &str| match index {
        Some(i) => players.iter().find(|p| p.index == i).map(|p| p.index),
        None => players
            .iter()
            .find(|p| p.full_name() == label)
            .map(|p| p.index),
    };
    let white = find(m.white, white_label)?;
    let black = find(m.black, black_label)?;

    let outcome = match m.score.parse::<Outcome>() {
        Ok(o) => Some(o),
        Err(_) if m.score.is_empty() || m.score == UNPLAYED => None,
        Err(_) => {
            log::warn!("Unknown score '{}' for match '{}'", m.score, m.label);
            None
        }
    };
    Some(GameMatch {
        white,
        black,
        outcome,
    })
}
