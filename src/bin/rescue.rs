use cityrescue::instance::Instance;
use cityrescue::mdp::{
    CityEnvironment, MdpAgentName, MdpConfig, PolicyIterationAgent, QLearningAgent,
};
use cityrescue::search::{run_missions, AggregateStatistics, SearchEngineName, SearchResult};
use cityrescue::Verbosity;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(version)]
/// Plan rescue missions in a city grid.
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(help = "The JSON city instance file")]
    instance: PathBuf,
    #[arg(
        value_enum,
        help = "The verbosity level",
        short = 'v',
        long = "verbosity",
        id = "VERBOSITY",
        default_value_t = Verbosity::Normal
    )]
    verbosity: Verbosity,
    #[arg(help = "Whether to use coloured output", short = 'c', long = "colour")]
    colour: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rescue every trapped person with a graph search from the departure.
    /// Each person is searched for independently.
    Search {
        #[arg(
            value_enum,
            help = "The search engine to use",
            short = 'e',
            long = "engine",
            id = "ENGINE",
            default_value_t = SearchEngineName::AStar,
            conflicts_with = "all"
        )]
        search_engine_name: SearchEngineName,
        #[arg(help = "Run every search engine in turn", long = "all")]
        all: bool,
        #[arg(
            help = "Depth bound for depth-limited search and cap for iterative \
            deepening, defaults to the number of cells",
            short = 'd',
            long = "depth-limit",
            id = "DEPTH"
        )]
        depth_limit: Option<usize>,
    },
    /// Treat the city as a Markov decision process with stochastic moves and
    /// compute a policy for every state.
    Mdp(MdpArgs),
}

#[derive(Args)]
struct MdpArgs {
    #[arg(
        value_enum,
        help = "The agent to run, both are run when omitted",
        short = 'a',
        long = "agent",
        id = "AGENT"
    )]
    agent_name: Option<MdpAgentName>,
    #[arg(
        help = "TOML file with the environment and agent settings",
        long = "config",
        id = "CONFIG"
    )]
    config: Option<PathBuf>,
    #[arg(help = "Number of Q-learning episodes", long = "episodes")]
    episodes: Option<u32>,
    #[arg(help = "Number of policy iteration sweeps", long = "iterations")]
    iterations: Option<u32>,
    #[arg(help = "Probability of moving in the intended direction", long = "stochasticity")]
    stochasticity: Option<f64>,
    #[arg(help = "Seed for Q-learning exploration", long = "seed")]
    seed: Option<u64>,
    #[arg(
        help = "Start policy iteration from the Q-learning policy when both agents run",
        long = "warm-start"
    )]
    warm_start: bool,
    #[arg(help = "Also print the Q-table and utility table", long = "tables")]
    tables: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level: tracing::Level = cli.verbosity.into();
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(cli.colour)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let instance = match Instance::from_path(&cli.instance) {
        Ok(instance) => instance,
        Err(e) => {
            error!("{}", e);
            eprintln!("Failed to load instance: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Search {
            search_engine_name,
            all,
            depth_limit,
        } => {
            let names = if all {
                SearchEngineName::ALL.to_vec()
            } else {
                vec![search_engine_name]
            };
            search(&instance, &names, depth_limit);
            ExitCode::SUCCESS
        }
        Commands::Mdp(args) => match mdp(&instance, args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("{}", e);
                eprintln!("Failed to load config: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn search(instance: &Instance, names: &[SearchEngineName], depth_limit: Option<usize>) {
    let grid = instance.grid();
    let mut aggregate = AggregateStatistics::new();
    for name in names {
        info!(engine = name.description(), "running missions");
        println!("=== {} ===", name.description());
        aggregate.reset();
        let mut engine = name.create(depth_limit);
        let reports = run_missions(&grid, instance.departure(), engine.as_mut(), &mut aggregate);
        for report in &reports {
            println!("Mission to {}", report.target);
            match &report.result {
                SearchResult::Success(solution) => {
                    println!("Path: {}", solution);
                    println!("Path length: {}", solution.len());
                    println!("Path cost: {}", solution.cost());
                }
                SearchResult::DepthLimitReached => println!("Depth limit reached"),
                SearchResult::Unsolvable => println!("No path found"),
            }
            println!("{}", report.statistics);
        }
        aggregate.log();
        println!("{}", aggregate);
    }
}

fn mdp(instance: &Instance, args: MdpArgs) -> Result<(), cityrescue::mdp::ConfigError> {
    let mut config = match &args.config {
        Some(path) => MdpConfig::from_path(path)?,
        None => MdpConfig::default(),
    };
    if let Some(episodes) = args.episodes {
        config.q_learning.episodes = episodes;
    }
    if let Some(iterations) = args.iterations {
        config.policy_iteration.iterations = iterations;
    }
    if let Some(stochasticity) = args.stochasticity {
        config.environment.stochasticity = stochasticity;
    }
    if args.seed.is_some() {
        config.q_learning.seed = args.seed;
    }
    config.validate()?;

    let env = CityEnvironment::new(instance.grid(), instance.departure(), &config.environment);

    let run_q_learning = args.agent_name != Some(MdpAgentName::PolicyIteration);
    let run_policy_iteration = args.agent_name != Some(MdpAgentName::QLearning);

    let mut learnt_policy = None;
    if run_q_learning {
        let mut agent = QLearningAgent::new(config.q_learning.clone());
        let policy = agent.learn(&env);
        println!("=== {} ===", MdpAgentName::QLearning.description());
        print!("{}", policy);
        print!("{}", policy.render(env.grid()));
        println!("{}", agent.statistics());
        if args.tables {
            print!("{}", agent.q_table());
        }
        learnt_policy = Some(policy);
    }

    if run_policy_iteration {
        let mut agent = PolicyIterationAgent::new(config.policy_iteration.clone());
        if args.warm_start {
            if let Some(policy) = learnt_policy {
                agent = agent.with_initial_policy(policy);
            }
        }
        let policy = agent.solve(&env);
        println!("=== {} ===", MdpAgentName::PolicyIteration.description());
        print!("{}", policy);
        print!("{}", policy.render(env.grid()));
        println!("Sweeps: {}", agent.sweeps());
        if args.tables {
            print!("{}", agent.utilities());
        }
    }
    Ok(())
}
