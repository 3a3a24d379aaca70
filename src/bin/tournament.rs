//! Operator console: one command per line on stdin.
//! Run with: cargo run --bin tournament
//! Data lives in ./data by default; override with env TOURNAMENT_DATA_DIR.
//! Log level via RUST_LOG (default info).

use chess_tournament::{
    JsonStore, PlayerLookup, PlayerRegistry, RandomPairing, Round, Tournament, TournamentDetails,
    TournamentDirectory,
};
use chrono::NaiveDate;
use std::io::{self, BufRead, Write};
use std::path::Path;

const HELP: &str = "\
Commands (<t> = tournament index, fields separated by ';'):
  players                                   list registered players
  register <name>;<given name>;<YYYY-MM-DD>;<elo>
  list                                      list tournaments
  new <name>;<start>;<end>;<max players>;<rounds>;<format>
  edit <t> <name>;<start>;<end>;<max players>;<rounds>;<format>
  delete <t>
  show <t>                                  details, players and rounds
  enroll <t> <player>  |  withdraw <t> <player>
  start <t>  |  finish <t>
  pair <t>                                  create the next round
  result <t> <round> <match> <1-0|0-1|0.5-0.5>
  amend <t> <round> <match> <1-0|0-1|0.5-0.5>
  drop-round <t> <round>
  export <t>  |  import <path>              copy a tournament to/from a JSON file
  standings <t>
  help  |  quit";

struct Console {
    directory: TournamentDirectory<JsonStore>,
    registry: PlayerRegistry,
    pairing: RandomPairing,
}

enum Flow {
    Continue,
    Quit,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let data_dir = std::env::var("TOURNAMENT_DATA_DIR").unwrap_or_else(|_| default_data_dir());
    log::info!("Using data directory {}", data_dir);

    let store = JsonStore::new(&data_dir);
    let registry = match store.load_players() {
        Ok(r) => r,
        Err(e) => {
            log::error!("Could not read player registry, starting empty: {}", e);
            PlayerRegistry::new()
        }
    };
    let mut console = Console {
        directory: TournamentDirectory::load(store),
        registry,
        pairing: RandomPairing::new(),
    };

    println!("{}", HELP);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match console.dispatch(line.trim()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("Error: {}", e),
        }
    }
    Ok(())
}

impl Console {
    fn dispatch(&mut self, line: &str) -> Result<Flow, String> {
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => return Ok(Flow::Quit),
            "players" => {
                for p in self.registry.players() {
                    println!("{:>4}  {} ({}, elo {})", p.index, p.full_name(), p.birthdate, p.rating);
                }
            }
            "register" => {
                let f = fields(rest, 4)?;
                let index = self.registry.register(
                    f[0],
                    f[1],
                    parse_date(f[2])?,
                    parse_num(f[3], "elo")?,
                );
                self.directory
                    .store()
                    .save_players(&self.registry)
                    .map_err(|e| format!("player {} registered but not saved: {}", index, e))?;
                println!("Player {} registered", index);
            }
            "list" => {
                for t in self.directory.tournaments() {
                    println!(
                        "{:>3}  {} ({} - {}) {:?}",
                        t.index,
                        t.name(),
                        t.details.start_date,
                        t.details.end_date,
                        t.status
                    );
                }
            }
            "new" => {
                let index = self
                    .directory
                    .add(parse_details(rest)?)
                    .map_err(|e| e.to_string())?;
                println!("Tournament {} created", index);
            }
            "edit" => {
                let (t, details) = rest.split_once(' ').ok_or("usage: edit <t> <details>")?;
                self.directory
                    .update_details(parse_num(t, "tournament")?, parse_details(details)?)
                    .map_err(|e| e.to_string())?;
                println!("Tournament updated");
            }
            "delete" => {
                let removed = self
                    .directory
                    .delete(parse_num(rest, "tournament")?)
                    .map_err(|e| e.to_string())?;
                println!("Tournament '{}' deleted", removed.name());
            }
            "show" => {
                let t = self
                    .directory
                    .get(parse_num(rest, "tournament")?)
                    .map_err(|e| e.to_string())?;
                print_tournament(t);
            }
            "enroll" => {
                let [t, p] = words::<2>(rest)?;
                let (t, p): (usize, u32) = (parse_num(t, "tournament")?, parse_num(p, "player")?);
                self.directory
                    .enroll(t, p, &self.registry)
                    .map_err(|e| e.to_string())?;
                let name = self
                    .registry
                    .lookup_by_index(p)
                    .map(|p| p.full_name())
                    .unwrap_or_default();
                println!("{} enrolled", name);
            }
            "withdraw" => {
                let [t, p] = words::<2>(rest)?;
                let (t, p): (usize, u32) = (parse_num(t, "tournament")?, parse_num(p, "player")?);
                self.directory
                    .withdraw(t, p)
                    .map_err(|e| e.to_string())?;
                println!("Player {} withdrawn", p);
            }
            "start" => {
                self.directory
                    .start(parse_num(rest, "tournament")?)
                    .map_err(|e| e.to_string())?;
                println!("Tournament started");
            }
            "finish" => {
                self.directory
                    .finish(parse_num(rest, "tournament")?)
                    .map_err(|e| e.to_string())?;
                println!("Tournament finished");
            }
            "pair" => {
                let t = parse_num(rest, "tournament")?;
                let number = self
                    .directory
                    .create_round(t, &mut self.pairing)
                    .map_err(|e| e.to_string())?;
                let tournament = self.directory.get(t).map_err(|e| e.to_string())?;
                if let Ok(round) = tournament.round(number) {
                    print_round(tournament, round);
                }
            }
            "result" | "amend" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                let [t, round, position, code] = parts[..] else {
                    return Err(format!("usage: {} <t> <round> <match> <code>", command));
                };
                let (t, round, position): (usize, u32, usize) = (
                    parse_num(t, "tournament")?,
                    parse_num(round, "round")?,
                    parse_num(position, "match")?,
                );
                let outcome = if command == "result" {
                    self.directory.record_result(t, round, position, code)
                } else {
                    self.directory.amend_result(t, round, position, code)
                }
                .map_err(|e| e.to_string())?;
                println!("Result {} recorded", outcome);
            }
            "drop-round" => {
                let [t, round] = words::<2>(rest)?;
                let (t, round): (usize, u32) =
                    (parse_num(t, "tournament")?, parse_num(round, "round")?);
                self.directory
                    .delete_round(t, round)
                    .map_err(|e| e.to_string())?;
                println!("Round {} deleted", round);
            }
            "export" => {
                let path = self
                    .directory
                    .export(parse_num(rest, "tournament")?)
                    .map_err(|e| e.to_string())?;
                println!("Exported to {}", path.display());
            }
            "import" => {
                if rest.is_empty() {
                    return Err("usage: import <path>".into());
                }
                let index = self
                    .directory
                    .import_file(Path::new(rest), &self.registry)
                    .map_err(|e| e.to_string())?;
                println!("Tournament {} imported", index);
            }
            "standings" => {
                let t = parse_num(rest, "tournament")?;
                let table = self.directory.standings(t).map_err(|e| e.to_string())?;
                let tournament = self.directory.get(t).map_err(|e| e.to_string())?;
                for (rank, s) in table.iter().enumerate() {
                    println!("{:>3}. {} : {}", rank + 1, player_name(tournament, s.player), s.points);
                }
            }
            other => return Err(format!("unknown command '{}', try help", other)),
        }
        Ok(Flow::Continue)
    }
}

fn print_tournament(t: &Tournament) {
    let d = &t.details;
    println!("{} [{}] {} - {}", d.name, d.format, d.start_date, d.end_date);
    println!(
        "Status {:?}, {} / {} players, {} / {} rounds",
        t.status,
        t.players().len(),
        d.max_players,
        t.rounds().len(),
        d.round_count
    );
    for p in t.players() {
        println!("  {:>4}  {} (elo {})", p.index, p.full_name(), p.rating);
    }
    for r in t.rounds() {
        print_round(t, r);
    }
}

fn print_round(t: &Tournament, r: &Round) {
    println!("Round {} ({}, {:?})", r.number, r.created_at.format("%Y-%m-%d %H:%M"), r.status);
    for (i, m) in r.matches.iter().enumerate() {
        println!(
            "  {}. {} - {} : {}",
            i + 1,
            player_name(t, m.white),
            player_name(t, m.black),
            m.outcome.map(|o| o.code()).unwrap_or("not played")
        );
    }
    if let Some(bye) = r.bye {
        println!("  bye: {}", player_name(t, bye));
    }
    for (rank, s) in r.standings.iter().enumerate() {
        println!("  {:>3}. {} : {}", rank + 1, player_name(t, s.player), s.points);
    }
}

fn player_name(t: &Tournament, index: u32) -> String {
    t.get_player(index)
        .map(|p| p.full_name())
        .unwrap_or_else(|| format!("#{}", index))
}

fn fields(s: &str, n: usize) -> Result<Vec<&str>, String> {
    let f: Vec<&str> = s.split(';').map(str::trim).collect();
    if f.len() != n {
        return Err(format!("expected {} fields separated by ';', got {}", n, f.len()));
    }
    Ok(f)
}

fn words<const N: usize>(s: &str) -> Result<[&str; N], String> {
    let words: Vec<&str> = s.split_whitespace().collect();
    words
        .try_into()
        .map_err(|_| format!("expected {} arguments", N))
}

fn parse_num<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("invalid {} '{}'", what, s.trim()))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", s.trim()))
}

fn parse_details(s: &str) -> Result<TournamentDetails, String> {
    let f = fields(s, 6)?;
    Ok(TournamentDetails {
        name: f[0].to_string(),
        start_date: parse_date(f[1])?,
        end_date: parse_date(f[2])?,
        max_players: parse_num(f[3], "max players")?,
        round_count: parse_num(f[4], "rounds")?,
        format: f[5].to_string(),
    })
}
