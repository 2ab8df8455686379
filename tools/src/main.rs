//! dispatch-runner: headless driver for the dispatch core.
//!
//! Usage:
//!   dispatch-runner --seed 12345 --scenario full --ticks 30
//!   dispatch-runner --seed 12345 --scenario random-calls --calls 25 --team "Team Alpha"
//!   dispatch-runner --seed 12345 --data-dir ./data --ipc-mode

use anyhow::Result;
use dispatch_core::{
    action_log::ActionLogEntry,
    config::SimConfig,
    engine::{DispatchEngine, DispatchOutcome, DEFAULT_HISTORY_LIMIT},
    rng::StreamRng,
    snapshot::ReportSnapshot,
};
use std::env;
use std::io::{self, BufRead, Write};

/// Seed-stream index for the runner's own coin flips. Kept clear of the
/// engine's slots.
const DRIVER_STREAM: u64 = 0x100;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Submit {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
        #[serde(default)]
        priority: Option<u8>,
    },
    Dispatch {
        #[serde(default)]
        incident_type: Option<String>,
    },
    Advance {
        #[serde(default = "one")]
        count: u64,
    },
    Record {
        text: String,
    },
    Report,
    History {
        #[serde(default)]
        team: Option<String>,
        #[serde(default)]
        limit: Option<usize>,
    },
    Quit,
}

fn one() -> u64 {
    1
}

#[derive(serde::Serialize)]
struct IpcReply {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<Vec<ActionLogEntry>>,
    report: ReportSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let calls = parse_arg(&args, "--calls", 5usize);
    let ticks = parse_arg(&args, "--ticks", 20u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let scenario = string_arg(&args, "--scenario").unwrap_or("full");
    let data_dir = string_arg(&args, "--data-dir");
    let team_filter = string_arg(&args, "--team");

    let config = match data_dir {
        Some(dir) => SimConfig::load(dir)?,
        None => SimConfig::default(),
    };
    let run_id = format!("run-{seed}-{}", uuid::Uuid::new_v4());

    if !ipc_mode {
        println!("Response dispatch: dispatch-runner");
        println!("  run_id:    {run_id}");
        println!("  seed:      {seed}");
        println!("  scenario:  {scenario}");
        println!("  data_dir:  {}", data_dir.unwrap_or("(built-in defaults)"));
        println!();
    }

    let mut engine = DispatchEngine::new(run_id, seed, config)?;

    if ipc_mode {
        return run_ipc_loop(&mut engine);
    }

    match scenario {
        "random-calls" => run_random_calls(&mut engine, calls)?,
        "full" => run_full(&mut engine, ticks)?,
        other => anyhow::bail!("Unknown scenario '{other}' (expected random-calls or full)"),
    }
    print_summary(&mut engine);
    print_history(&engine, team_filter);
    Ok(())
}

/// Each call submits an incident, dispatches with 70% probability, and
/// advances the clock on every other call.
fn run_random_calls(engine: &mut DispatchEngine, calls: usize) -> Result<()> {
    let mut coin = StreamRng::new(engine.seed(), DRIVER_STREAM).with_name("driver");
    println!("=== SIMULATING {calls} EMERGENCY CALLS ===");
    for i in 0..calls {
        let point_id = engine.submit_incident()?;
        println!("call {}: incident {point_id} queued", i + 1);
        if coin.chance(0.7) {
            report_outcome(&engine.dispatch_next()?);
        }
        if i % 2 == 0 {
            engine.advance_time()?;
        }
    }
    println!();
    Ok(())
}

/// Submit a batch, dispatch while work and free teams remain, then let
/// missions run out.
fn run_full(engine: &mut DispatchEngine, ticks: u64) -> Result<()> {
    println!("=== FULL SIMULATION ===");
    for _ in 0..8 {
        engine.submit_incident()?;
    }
    while engine.queue_len() > 0 && engine.available_team_count() > 0 {
        report_outcome(&engine.dispatch_next()?);
        engine.advance_time()?;
    }
    let completed = engine.run_ticks(ticks)?;
    println!("{} missions completed while waiting", completed.len());
    println!();
    Ok(())
}

fn report_outcome(outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Dispatched { team_name, incident_type, distance, .. } => {
            println!("  {team_name} dispatched to {incident_type} ({distance:.1} away)");
        }
        DispatchOutcome::NoTeamAvailable { point_id } => {
            println!("  no team available; {point_id} requeued");
        }
        DispatchOutcome::NoIncidentPending => println!("  no incident pending"),
    }
}

fn run_ipc_loop(engine: &mut DispatchEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "ok": false, "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        if matches!(cmd, IpcCommand::Quit) {
            break;
        }
        let line = match handle_command(engine, cmd) {
            Ok((outcome, history)) => serde_json::to_string(&IpcReply {
                ok: true,
                outcome,
                error: None,
                history,
                report: engine.report(),
            })?,
            Err(e) => {
                log::warn!("ipc command failed: {e}");
                serde_json::to_string(&IpcReply {
                    ok: false,
                    outcome: None,
                    error: Some(e.to_string()),
                    history: None,
                    report: engine.report(),
                })?
            }
        };
        writeln!(stdout, "{line}")?;
        stdout.flush()?;
    }
    Ok(())
}

type CommandReply = (Option<String>, Option<Vec<ActionLogEntry>>);

fn handle_command(engine: &mut DispatchEngine, cmd: IpcCommand) -> Result<CommandReply> {
    let outcome = match cmd {
        IpcCommand::Submit { x: Some(x), y: Some(y), priority } => {
            let id = engine.submit_incident_at(x, y, priority.unwrap_or(1))?;
            format!("submitted {id}")
        }
        IpcCommand::Submit { x: None, y: None, .. } => {
            format!("submitted {}", engine.submit_incident()?)
        }
        IpcCommand::Submit { .. } => anyhow::bail!("submit needs both x and y, or neither"),
        IpcCommand::Dispatch { incident_type } => {
            let outcome = match incident_type {
                Some(t) => engine.dispatch_next_as(&t)?,
                None => engine.dispatch_next()?,
            };
            format!("{outcome:?}")
        }
        IpcCommand::Advance { count } => {
            let done = engine.run_ticks(count)?;
            format!("advanced {count}, {} completed", done.len())
        }
        IpcCommand::Record { text } => {
            engine.record_action(&text);
            "recorded".to_string()
        }
        IpcCommand::Report => {
            engine.take_report();
            format!("report {} kept", engine.reports().len())
        }
        IpcCommand::History { team, limit } => {
            let history = engine
                .history(team.as_deref(), limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
                .into_iter()
                .cloned()
                .collect();
            return Ok((None, Some(history)));
        }
        IpcCommand::Quit => return Ok((None, None)),
    };
    Ok((Some(outcome), None))
}

fn print_summary(engine: &mut DispatchEngine) {
    let report = engine.take_report();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:          {}", report.run_id);
    println!("  sim time:        {}", report.sim_time);
    println!("  submitted:       {}", report.total_incidents_submitted);
    println!("  dispatches:      {}", report.total_dispatches);
    println!("  completions:     {}", report.total_completions);
    println!("  active:          {}", report.active_incident_count);
    println!("  pending:         {}", report.pending_queue_size);

    println!();
    println!("=== TEAMS ===");
    for team in engine.teams() {
        println!("  {team}");
        if !team.history().is_empty() {
            println!("    missions completed: {}", team.history().len());
        }
    }
}

fn print_history(engine: &DispatchEngine, team: Option<&str>) {
    println!();
    println!("=== ACTION HISTORY ===");
    let entries = engine.history(team, DEFAULT_HISTORY_LIMIT);
    if entries.is_empty() {
        println!("  (no actions recorded)");
    }
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {:2}. [{}] t={} {}",
            i + 1,
            entry.wall_clock.with_timezone(&chrono::Local).format("%H:%M:%S"),
            entry.sim_time,
            entry.text
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
