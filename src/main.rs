use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgMatches, Command};
use log::{error, info};

use sparse_net::{
    cross_validate, load_ids, write_report, Error, Evaluation, ExampleSet, LabelMode, Objective, Predictor, Result,
    ShuffleMode, Trainer, TrainingOptions, TrainingOptionsBuilder, FEATURE_COUNT,
};

fn main() {
    env_logger::init();

    let matches = cli().get_matches();

    if let Err(err) = run(&matches) {
        error!("{}", err);
        eprintln!("error: {}", err);
        process::exit(err.exit_code());
    }
}

fn cli() -> Command {
    Command::new("sparse_net")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Trains and evaluates a linear or multilayer classifier on sparse examples")
        .arg(
            Arg::new("train")
                .long("train")
                .value_name("FILE")
                .help("Training examples")
                .required(true)
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("test")
                .long("test")
                .value_name("FILE")
                .help("Test examples, loaded into the training storage after training")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("epochs")
                .long("epochs")
                .short('e')
                .value_name("COUNT")
                .default_value("200")
                .value_parser(value_parser!(usize))
        )
        .arg(
            Arg::new("gamma0")
                .long("gamma0")
                .short('g')
                .value_name("RATE")
                .help("Initial learning rate")
                .default_value("0.01")
                .value_parser(value_parser!(f64))
        )
        .arg(
            Arg::new("c")
                .short('C')
                .value_name("C")
                .help("Learning rate decay constant of the margin objective")
                .default_value("1024")
                .value_parser(value_parser!(f64))
        )
        .arg(
            Arg::new("s")
                .short('s')
                .value_name("S")
                .help("Regularization scale of the margin objective")
                .default_value("10e5")
                .value_parser(value_parser!(f64))
        )
        .arg(
            Arg::new("layers")
                .long("layers")
                .short('l')
                .value_name("COUNT")
                .help("Hidden layers; 0 trains a linear unit")
                .default_value("0")
                .value_parser(value_parser!(usize))
        )
        .arg(
            Arg::new("nodes")
                .long("nodes")
                .short('n')
                .value_name("COUNT")
                .help("Nodes per hidden layer")
                .default_value("180")
                .value_parser(value_parser!(usize))
        )
        .arg(
            Arg::new("objective")
                .long("objective")
                .default_value("squared")
                .value_parser(["squared", "margin"])
        )
        .arg(
            Arg::new("label-mode")
                .long("label-mode")
                .default_value("sign")
                .value_parser(["sign", "raw"])
        )
        .arg(
            Arg::new("shuffle")
                .long("shuffle")
                .default_value("compat")
                .value_parser(["compat", "uniform"])
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed string for reproducible runs")
        )
        .arg(
            Arg::new("folds")
                .long("folds")
                .value_name("COUNT")
                .help("Run k-fold cross-validation on the training set")
                .value_parser(value_parser!(usize))
        )
        .arg(
            Arg::new("eval")
                .long("eval")
                .value_name("FILE")
                .help("Examples whose predictions are written to --predictions")
                .requires("predictions")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("eval-ids")
                .long("eval-ids")
                .value_name("FILE")
                .help("One example id per line, paired in order with the --eval examples")
                .requires("eval")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("predictions")
                .long("predictions")
                .value_name("FILE")
                .help("Write example_id,label rows for --eval, or else for the last evaluated set")
                .value_parser(value_parser!(PathBuf))
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("FILE")
                .help("Write evaluation metrics as CSV")
                .value_parser(value_parser!(PathBuf))
        )
}

fn arg<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches.get_one::<T>(id)
        .cloned()
        .ok_or_else(|| Error::Config(format!("missing value for {}", id)))
}

fn training_options(matches: &ArgMatches) -> Result<TrainingOptions> {
    let objective = match arg::<String>(matches, "objective")?.as_str() {
        "margin" => Objective::MarginRegularized {
            c: arg(matches, "c")?,
            s: arg(matches, "s")?,
        },
        _ => Objective::SquaredLoss,
    };
    let shuffle = match arg::<String>(matches, "shuffle")?.as_str() {
        "uniform" => ShuffleMode::Uniform,
        _ => ShuffleMode::Compat,
    };
    TrainingOptionsBuilder::default()
        .feature_count(FEATURE_COUNT)
        .layer_count(arg(matches, "layers")?)
        .layer_node_count(arg(matches, "nodes")?)
        .epochs(arg(matches, "epochs")?)
        .gamma0(arg(matches, "gamma0")?)
        .objective(objective)
        .shuffle(shuffle)
        .seed(matches.get_one::<String>("seed").cloned())
        .finish()
}

fn run(matches: &ArgMatches) -> Result<()> {

    let options = training_options(matches)?;
    let label_mode = match arg::<String>(matches, "label-mode")?.as_str() {
        "raw" => LabelMode::Raw,
        _ => LabelMode::Sign,
    };
    info!("{:?}", options);

    let mut examples = ExampleSet::load(arg::<PathBuf>(matches, "train")?, options.feature_count, label_mode)?;

    if let Some(&folds) = matches.get_one::<usize>("folds") {
        let evaluations = cross_validate(&options, &examples, folds)?;
        println!("fold\tacc\tpre\trec\tF1");
        for (fold, evaluation) in evaluations.iter().enumerate() {
            println!("{}\t{}", fold + 1, evaluation);
        }
    }

    let mut trainer = Trainer::new(options)?;
    let mut weights = trainer.new_weights()?;
    let result = trainer.train(&mut examples, &mut weights)?;

    let mut predictor = Predictor::new(trainer.config())?;
    let mut rows: Vec<(&str, Evaluation)> = vec![("train", predictor.evaluate(&weights, &examples)?)];

    if let Some(test) = matches.get_one::<PathBuf>("test") {
        examples.reload(test, label_mode)?;
        rows.push(("test", predictor.evaluate(&weights, &examples)?));
    }

    println!("dataset\tacc\tpre\trec\tF1");
    for (dataset, evaluation) in &rows {
        println!("{}\t{}", dataset, evaluation);
    }
    println!("duration = {}s, error_stats = {:?}", result.duration.as_secs_f32(), &result.error_stats);

    if let Some(path) = matches.get_one::<PathBuf>("predictions") {
        let ids = match matches.get_one::<PathBuf>("eval-ids") {
            Some(ids) => Some(load_ids(ids)?),
            None => None,
        };
        if let Some(eval) = matches.get_one::<PathBuf>("eval") {
            examples.reload(eval, label_mode)?;
        }
        predictor.write_predictions(&weights, &examples, ids.as_deref(), path)?;
    }
    if let Some(path) = matches.get_one::<PathBuf>("report") {
        write_report(&rows, path)?;
    }

    Ok(())
}
