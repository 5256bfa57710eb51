use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use opti::model::{
    BoardRequest, MaterialRequest, OptimizeRequest, OptimizeResponse, ParamsRequest, PartRequest,
};
use opti::render;
use opti::{Optimizer, OptimizerConfig};
use tracing::Level;

#[derive(Parser)]
#[command(name = "opti", about = "2D rectangular cutting stock optimizer")]
struct Cli {
    /// Request JSON file (reads stdin when omitted and no --board is given)
    input: Option<PathBuf>,

    /// Board dimensions in mm (WxH, e.g. 2800x2070); builds a one-material request
    #[arg(long)]
    board: Option<String>,

    /// Parts as WxH:qty (e.g. 600x400:2 300x200:5)
    #[arg(long = "cuts", num_args = 1.., requires = "board")]
    cuts: Vec<String>,

    /// Blade kerf width in mm
    #[arg(long, default_value_t = 0.0, requires = "board")]
    kerf: f64,

    /// Trim in mm, either one value for all edges or top,right,bottom,left
    #[arg(long, requires = "board")]
    trim: Option<String>,

    /// Disable part rotation
    #[arg(long, requires = "board")]
    no_rotate: bool,

    /// Seed for tie-breaking between equally ranked parts
    #[arg(long, requires = "board")]
    seed: Option<u64>,

    /// Optimize materials in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the response as JSON
    #[arg(long)]
    json: bool,

    /// Show ASCII layout of each board
    #[arg(long)]
    layout: bool,

    /// Log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_dimensions(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let w = parts[0]
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let h = parts[1]
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    Ok((w, h))
}

fn parse_cut(index: usize, s: &str, allow_rotate: bool) -> Result<PartRequest, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err(format!("invalid cut '{}', expected WxH:qty", s));
    }
    let (w_mm, h_mm) = parse_dimensions(parts[0])?;
    let qty = parts[1]
        .parse::<u32>()
        .map_err(|_| format!("invalid quantity in '{}'", s))?;
    Ok(PartRequest {
        id: format!("{}:{}", index + 1, parts[0]),
        w_mm: Some(w_mm),
        h_mm: Some(h_mm),
        qty: Some(qty as f64),
        allow_rot_90: allow_rotate,
        grain_locked: false,
    })
}

fn parse_trim(s: &str) -> Result<[f64; 4], String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("invalid trim '{}'", s))?;
    match values.as_slice() {
        [all] => Ok([*all; 4]),
        [top, right, bottom, left] => Ok([*top, *right, *bottom, *left]),
        _ => Err(format!(
            "invalid trim '{}', expected one value or top,right,bottom,left",
            s
        )),
    }
}

fn request_from_flags(cli: &Cli, board: &str) -> Result<OptimizeRequest, String> {
    let (w_mm, h_mm) = parse_dimensions(board)?;
    let [top, right, bottom, left] = match &cli.trim {
        Some(t) => parse_trim(t)?,
        None => [0.0; 4],
    };
    let parts = cli
        .cuts
        .iter()
        .enumerate()
        .map(|(i, c)| parse_cut(i, c, !cli.no_rotate))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OptimizeRequest {
        materials: vec![MaterialRequest {
            id: "cli".to_string(),
            name: board.to_string(),
            parts,
            board: Some(BoardRequest {
                w_mm: Some(w_mm),
                h_mm: Some(h_mm),
                trim_top_mm: top,
                trim_right_mm: right,
                trim_bottom_mm: bottom,
                trim_left_mm: left,
            }),
            params: ParamsRequest {
                kerf_mm: cli.kerf,
                seed: cli.seed,
                ..ParamsRequest::default()
            },
        }],
    })
}

fn read_request(input: Option<&PathBuf>) -> Result<OptimizeRequest, String> {
    let text = match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("cannot read stdin: {}", e))?;
            buf
        }
    };
    serde_json::from_str(&text).map_err(|e| format!("invalid request: {}", e))
}

fn print_summary(response: &OptimizeResponse, layout: bool) {
    for result in &response.results {
        println!("Material {} ({}):", result.material_id, result.material_name);
        for board_id in 0..result.metrics.boards_used {
            println!("  Board {}:", board_id + 1);
            for p in result.placements.iter().filter(|p| p.board_id == board_id) {
                let rot = if p.rot_deg == 90 { " [rotated]" } else { "" };
                println!(
                    "    {} {}x{} @ ({}, {}){}",
                    p.id, p.w_mm, p.h_mm, p.x_mm, p.y_mm, rot
                );
            }
            if layout {
                print!("{}", render::render_board(result, board_id));
            }
        }
        for u in &result.unplaced {
            let reason = u.reason.map(|r| format!(" ({})", r)).unwrap_or_default();
            println!("  Unplaced: {} {}x{}{}", u.id, u.w_mm, u.h_mm, reason);
        }
        let m = &result.metrics;
        println!(
            "  Summary: {} board{} used, {:.2}% waste, {} mm cut length",
            m.boards_used,
            if m.boards_used == 1 { "" } else { "s" },
            m.waste_pct,
            m.total_cut_length_mm,
        );
        println!();
    }
    for e in &response.errors {
        println!("Material {} ({}) rejected: {}", e.material_id, e.material_name, e.error);
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(level)
        .init();

    let request = match &cli.board {
        Some(board) => request_from_flags(&cli, board),
        None => read_request(cli.input.as_ref()),
    }
    .unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let optimizer = Optimizer::new(OptimizerConfig {
        parallel: cli.parallel,
    });
    let response = optimizer.optimize(&request);

    if cli.json {
        match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_summary(&response, cli.layout);
    }

    if !response.errors.is_empty() {
        std::process::exit(2);
    }
}
