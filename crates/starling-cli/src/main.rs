use serde::Serialize;
use starling::metrics::{self, Centrality, NetworkStats};
use starling::{Detector, Graph, LayoutOptions};
use std::io::Read;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Json(serde_json::Error),
    Layout(starling::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<starling::Error> for CliError {
    fn from(value: starling::Error) -> Self {
        Self::Layout(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Stats,
    Communities,
}

/// Individual option overrides, applied on top of `--config`.
#[derive(Debug, Default)]
struct Overrides {
    seed: Option<u64>,
    resolution: Option<f64>,
    max_radius: Option<f64>,
    relax_iterations: Option<usize>,
    collision_iterations: Option<usize>,
    detector: Option<Detector>,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    verbose: bool,
    out: Option<String>,
    config: Option<String>,
    overrides: Overrides,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsOut {
    stats: NetworkStats,
    degree_centrality: Centrality,
    betweenness_centrality: Centrality,
}

fn usage() -> &'static str {
    "starling\n\
\n\
USAGE:\n\
  starling [layout] [OPTIONS] [<path>|-]\n\
  starling stats [--pretty] [--out <path>] [<path>|-]\n\
  starling communities [OPTIONS] [<path>|-]\n\
\n\
OPTIONS:\n\
  --pretty                      pretty-print the JSON output\n\
  --out <path>                  write the output to a file instead of stdout\n\
  --config <file.json>          layout options (camelCase keys, partial objects allowed)\n\
  --seed <n>                    fix the random seed\n\
  --resolution <r>              community resolution (default 1.5)\n\
  --max-radius <r>              radius of a degree-0 node (default 500)\n\
  --relax-iterations <n>        refinement passes (default 60)\n\
  --collision-iterations <n>    damped collision passes (default 80)\n\
  --detector louvain|lpa|single first community detector to try\n\
  --verbose                     log stage details to stderr\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph is read from stdin.\n\
  - The graph is either a friends snapshot {\"friends\": {..}, \"edges\": {\"a|b\": n}} or\n\
    {\"nodes\": [{\"id\": ..}], \"edges\": [{\"source\": .., \"target\": .., \"weight\": ..}]}.\n\
  - RUST_LOG overrides the log level; STARLING_LAYOUT_TIMING=1 logs stage timings.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_value<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "stats" => args.command = Command::Stats,
            "communities" => args.command = Command::Communities,
            "--pretty" => args.pretty = true,
            "--verbose" | "-v" => args.verbose = true,
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--seed" => args.overrides.seed = Some(parse_value(next_value(&mut it)?)?),
            "--resolution" => {
                args.overrides.resolution = Some(parse_value(next_value(&mut it)?)?);
            }
            "--max-radius" => {
                args.overrides.max_radius = Some(parse_value(next_value(&mut it)?)?);
            }
            "--relax-iterations" => {
                args.overrides.relax_iterations = Some(parse_value(next_value(&mut it)?)?);
            }
            "--collision-iterations" => {
                args.overrides.collision_iterations = Some(parse_value(next_value(&mut it)?)?);
            }
            "--detector" => {
                let raw = next_value(&mut it)?;
                args.overrides.detector = Some(
                    raw.parse::<Detector>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn layout_options(args: &Args) -> Result<LayoutOptions, CliError> {
    let mut opts = match &args.config {
        Some(path) => serde_json::from_str::<LayoutOptions>(&std::fs::read_to_string(path)?)?,
        None => LayoutOptions::default(),
    };
    let o = &args.overrides;
    if let Some(seed) = o.seed {
        opts.random_seed = Some(seed);
    }
    if let Some(resolution) = o.resolution {
        opts.resolution = resolution;
    }
    if let Some(max_radius) = o.max_radius {
        opts.max_radius = max_radius;
    }
    if let Some(n) = o.relax_iterations {
        opts.relax_iterations = n;
    }
    if let Some(n) = o.collision_iterations {
        opts.collision_iterations = n;
    }
    if let Some(detector) = o.detector {
        opts.detector = detector;
    }
    opts.validate()?;
    Ok(opts)
}

fn write_json(value: &impl Serialize, pretty: bool, out: Option<&str>) -> Result<(), CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    match out {
        None | Some("-") => {
            use std::io::Write;
            std::io::stdout().lock().write_all(text.as_bytes())?;
        }
        Some(path) => std::fs::write(path, text)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let graph = Graph::from_json(&text)?;
    log::debug!(
        "loaded graph: {} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    match args.command {
        Command::Layout => {
            let opts = layout_options(&args)?;
            let result = starling::layout(&graph, &opts)?;
            log::info!(
                "laid out {} nodes in {} sectors (seed {})",
                result.nodes.len(),
                result.communities.len(),
                result.seed
            );
            write_json(&result, args.pretty, args.out.as_deref())
        }
        Command::Communities => {
            let opts = layout_options(&args)?;
            let found = starling::communities(&graph, &opts)?;
            write_json(&found, args.pretty, args.out.as_deref())
        }
        Command::Stats => {
            let g = graph.to_graphlib()?;
            let out = StatsOut {
                stats: NetworkStats::compute(&g),
                degree_centrality: metrics::degree_centrality(&g),
                betweenness_centrality: metrics::betweenness_centrality(&g),
            };
            write_json(&out, args.pretty, args.out.as_deref())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
