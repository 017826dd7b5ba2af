mod cli;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::process::ExitCode;

use egg_lib::Options;

fn main() -> ExitCode {
    let matches = cli::build_cli().get_matches();
    let params = cli::RunParams::from_matches(&matches);
    match run(&params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err.to_string().trim_end());
            ExitCode::FAILURE
        }
    }
}

fn run(params: &cli::RunParams) -> Result<(), egg_lib::Error> {
    let options = Options {
        grammar_name: params.grammar_name.clone(),
        normalize: params.normalize,
        mode: params.mode,
    };

    let mut input: Box<dyn Read> = match &params.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin()),
    };
    let mut output: Box<dyn Write> = match &params.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    egg_lib::run(&mut *input, &mut *output, &options)?;
    output.flush()?;
    Ok(())
}
