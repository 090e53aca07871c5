use clap::{Parser, Subcommand};
use dotenv::dotenv;
use flowdraft::adk::model::{GenerationConfig, Provider};
use flowdraft::flowdraft::config::{AgentSettings, ServerSettings, DEFAULT_HOST, DEFAULT_PORT};
use flowdraft::flowdraft::generator::WorkflowGenerator;
use flowdraft::flowdraft::server;
use flowdraft::flowdraft::workflow::{extract, normalize};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        #[command(flatten)]
        agent: AgentArgs,
    },
    /// Print the keyword-extracted workflow for a description
    Extract {
        #[arg(short, long)]
        description: String,
    },
    /// Strip code fences from a model reply
    Normalize {
        #[arg(short, long)]
        text: String,
    },
    /// Generate a workflow once, through the agent when one is configured
    Generate {
        #[arg(short, long)]
        description: String,

        #[command(flatten)]
        agent: AgentArgs,
    },
}

#[derive(clap::Args, Debug)]
struct AgentArgs {
    /// Model provider: cohere, openai or anthropic
    #[arg(long, default_value = "cohere")]
    provider: Provider,

    /// Model name (defaults per provider)
    #[arg(short, long)]
    model: Option<String>,

    #[arg(long)]
    temperature: Option<f32>,

    /// Upper bound on tokens in the model reply
    #[arg(long)]
    max_tokens: Option<u32>,

    #[arg(long)]
    top_p: Option<f32>,

    #[arg(long)]
    top_k: Option<u32>,

    /// Skip the model and use keyword extraction only
    #[arg(long)]
    no_agent: bool,
}

impl AgentArgs {
    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }

    fn settings(&self) -> Option<AgentSettings> {
        if self.no_agent {
            return None;
        }

        let generation = self.generation_config();
        match AgentSettings::from_env(self.provider, self.model.clone(), generation) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Agent disabled: {}", e);
                None
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, agent } => {
            let generator = WorkflowGenerator::from_settings(agent.settings().as_ref()).await;
            server::serve(&ServerSettings { host, port }, generator).await?;
        }
        Commands::Extract { description } => {
            let workflow = extract(&description);
            println!("{}", serde_json::to_string_pretty(&workflow)?);
        }
        Commands::Normalize { text } => {
            println!("{}", normalize(&text));
        }
        Commands::Generate { description, agent } => {
            let generator = WorkflowGenerator::from_settings(agent.settings().as_ref()).await;
            let workflow = generator.generate(&description).await?;
            println!("{}", serde_json::to_string_pretty(&workflow)?);
        }
    }

    Ok(())
}
