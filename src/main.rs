//! Disease Classification CLI
//!
//! Classifies a patient from ten clinical features with a pre-trained network.

use clap::{Args, Parser, Subcommand};
use disease_class::predict::OutputFormat;
use disease_class::{Config, Result};

#[derive(Parser)]
#[command(name = "disease-class")]
#[command(about = "Disease classification from clinical features", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one patient from command-line values
    Predict(PredictArgs),
    /// Fill in the input form interactively
    Form {
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// List the known classes and their descriptions
    Classes {
        #[command(flatten)]
        display: DisplayArgs,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show model information
    Info,
    /// Write a freshly initialized (untrained) model for smoke testing
    Init {
        /// Seed for weight initialization
        #[arg(long)]
        seed: Option<u64>,
        /// Overwrite an existing model file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Clone, Debug)]
struct DisplayArgs {
    /// Output format (table, json, csv); defaults to the config value
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Args, Clone, Debug)]
struct PredictArgs {
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    disease_group: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    disease_classification: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    income_level: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    severity_of_coma_score: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    medical_charges: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    total_cost: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    blood_ph_level: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    adl_physical: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    adl_social: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    adl_cognitive: f64,

    /// All ten values in model order, comma separated (overrides the named flags)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    values: Option<Vec<f64>>,

    #[command(flatten)]
    display: DisplayArgs,
}

impl PredictArgs {
    fn raw_values(&self) -> Vec<f64> {
        match &self.values {
            Some(values) => values.clone(),
            None => vec![
                self.disease_group,
                self.disease_classification,
                self.income_level,
                self.severity_of_coma_score,
                self.medical_charges,
                self.total_cost,
                self.blood_ph_level,
                self.adl_physical,
                self.adl_social,
                self.adl_cognitive,
            ],
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Predict(args) => commands::predict(&config, &args),
        Commands::Form { display } => commands::form(&config, &display),
        Commands::Classes { display } => commands::classes(&config, &display),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
            ModelCommands::Init { seed, force } => commands::model_init(&config, seed, force),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::NdArray;
    use burn::tensor::backend::Backend;
    use disease_class::features::FeatureVector;
    use disease_class::model::{ClassifierNet, ClassifierNetConfig};
    use disease_class::predict::render::tier_style;
    use disease_class::predict::{BurnScoreModel, Classifier};
    use disease_class::{ClassLabel, ClassifierError, DisplayConfig};

    type MyBackend = NdArray<f32>;

    fn display_config(config: &Config, args: &DisplayArgs) -> DisplayConfig {
        DisplayConfig {
            color: config.display.color && !args.no_color,
            format: args.format.unwrap_or(config.display.format),
        }
    }

    fn model_dir(config: &Config) -> Option<&std::path::Path> {
        std::path::Path::new(&config.model.path)
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    fn load_classifier(config: &Config) -> Result<Classifier<BurnScoreModel<MyBackend>>> {
        let model = BurnScoreModel::<MyBackend>::load(&config.model, NdArrayDevice::default())?;
        Ok(Classifier::new(model))
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        if let Some(dir) = model_dir(&config) {
            std::fs::create_dir_all(dir)?;
            println!("Created {}/ directory", dir.display());
        }

        println!("\nNext steps:");
        println!("  1. Copy the trained model to {}", config.model.artifact_file());
        println!("  2. Edit {} if the model uses input scaling", config_path);
        println!("  3. Run 'disease-class form' to classify a patient");

        Ok(())
    }

    pub fn predict(config: &Config, args: &PredictArgs) -> Result<()> {
        let classifier = load_classifier(config)?;
        let display = display_config(config, &args.display);

        let features = FeatureVector::from_values(&args.raw_values())?;
        let output = disease_class::form::respond(&classifier, &features, &display)?;
        print!("{}", output);

        Ok(())
    }

    pub fn form(config: &Config, args: &DisplayArgs) -> Result<()> {
        let classifier = load_classifier(config)?;
        let display = display_config(config, args);
        disease_class::form::run(&classifier, &display)
    }

    pub fn classes(config: &Config, args: &DisplayArgs) -> Result<()> {
        let display = display_config(config, args);

        for label in ClassLabel::ALL {
            let d = label.description();
            let title = if display.color {
                tier_style(d.tier).apply_to(d.title).to_string()
            } else {
                d.title.to_string()
            };
            println!("{}  {}", label.index(), title);
            println!("   {}\n", d.text);
        }

        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let model_file = config.model.artifact_file();
        let exists = std::path::Path::new(&model_file).exists();

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:           {}", model_file);
        println!("  Present:        {}", if exists { "yes" } else { "no" });
        println!("  Inputs:         {}", FeatureVector::DIM);
        println!("  Hidden layers:  {:?}", config.model.hidden_dims);
        println!("  Classes:        {}", config.model.num_classes);
        match &config.model.scaling {
            Some(_) => println!("  Input scaling:  z-score"),
            None => println!("  Input scaling:  none"),
        }

        if !exists {
            return Err(ClassifierError::Load {
                path: model_file,
                message: "model artifact not found".to_string(),
            });
        }

        Ok(())
    }

    pub fn model_init(config: &Config, seed: Option<u64>, force: bool) -> Result<()> {
        let model_file = config.model.artifact_file();
        if std::path::Path::new(&model_file).exists() && !force {
            return Err(ClassifierError::Config(format!(
                "{} already exists (use --force to overwrite)",
                model_file
            )));
        }

        if let Some(seed) = seed {
            MyBackend::seed(seed);
        }

        if let Some(dir) = model_dir(config) {
            std::fs::create_dir_all(dir)?;
        }

        let device = NdArrayDevice::default();
        let net = ClassifierNet::<MyBackend>::new(
            &device,
            ClassifierNetConfig::from_model_config(&config.model),
        );
        net.save(&config.model.path)?;

        println!("Wrote untrained model to {}", model_file);
        println!("Predictions from this model are not meaningful; replace it with a trained one.");

        Ok(())
    }
}
