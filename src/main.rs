use std::{
    env,
    io::{self, BufWriter, Write},
    process::ExitCode,
};

use svm_tfidf_corpus::{
    classifier::bundle::corpus_from_zip,
    utils::{lines::LineReader, memzip::MemZip},
    ClassifierConfig, Corpus, MalformedPair, Result,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tfidf-classify <vectorize|inspect> <corpus.zip> [--skip-pair] [--ignore-case] [--no-word-boundaries]";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_flags(flags: &[String]) -> std::result::Result<ClassifierConfig, String> {
    let mut config = ClassifierConfig::default();
    for flag in flags {
        match flag.as_str() {
            "--skip-pair" => config.loader.malformed_pair = MalformedPair::SkipPair,
            "--ignore-case" => config.tokenizer.ascii_case_insensitive = true,
            "--no-word-boundaries" => config.tokenizer.word_boundaries = false,
            other => return Err(format!("unknown flag `{}`", other)),
        }
    }
    Ok(config)
}

// stdin の各行をベクトル化して libsvm 形式で出力
fn vectorize(corpus: &Corpus) -> Result<()> {
    let stdin = io::stdin();
    let mut out = BufWriter::new(io::stdout().lock());
    let mut lines = LineReader::new(stdin.lock());
    while let Some((_, raw)) = lines.next_line()? {
        writeln!(out, "{}", corpus.vector_bytes(raw))?;
    }
    out.flush()?;
    Ok(())
}

fn inspect(corpus: &Corpus) -> Result<()> {
    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(out, "classes: {}", corpus.class_num())?;
    for (pos, name) in corpus.class_names().enumerate() {
        writeln!(out, "  {}\t{}", pos + 1, name)?;
    }
    writeln!(out, "training records: {}", corpus.doc_num())?;
    writeln!(out, "features: {}", corpus.feature_num())?;
    for (pos, (name, idf)) in corpus.feature_names().zip(corpus.idf_vec()).enumerate() {
        writeln!(out, "  {}\t{}\t{:.6}", pos + 1, name, idf)?;
    }
    out.flush()?;
    Ok(())
}

fn run(command: &str, bundle: &str, config: &ClassifierConfig) -> Result<()> {
    let mz = MemZip::open(bundle)?;
    let corpus: Corpus = corpus_from_zip(&mz, config)?;
    match command {
        "vectorize" => vectorize(&corpus),
        _ => inspect(&corpus),
    }
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || !matches!(args[1].as_str(), "vectorize" | "inspect") {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }
    let config = match parse_flags(&args[3..]) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match run(&args[1], &args[2], &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
