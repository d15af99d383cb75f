use qircbot::bot::{Quiz, QUESTIONS_DB};
use qircbot::{bot, Args, Config};

const DEFAULT_CFG_FILE: &str = ".quizbot.cfg";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_or_exit();

    std::env::set_var("RUST_LOG", if args.verbose { "trace" } else { "info" });
    let opts = alto_logger::Options::default()
        .with_time(alto_logger::options::TimeConfig::date_time_format("%c"));
    let logger = alto_logger::MultiLogger::new() //
        .with(alto_logger::TermLogger::new(opts)?);
    alto_logger::init(logger).expect("init logger");

    let (path, explicit) = Config::resolve_path(args.config, DEFAULT_CFG_FILE);
    let config = Config::load(&path, explicit).await?;

    let quiz = Quiz::new(&config.quizbot_nick, QUESTIONS_DB);

    log::info!("bot initialising");
    bot::run(config, Some(quiz)).await
}
