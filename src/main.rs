use csv_yaml::error::ConvertError;

fn main() {
    match csv_yaml::run() {
        Ok(summary) => println!("{}", summary.report()),
        Err(err) => {
            match &err {
                ConvertError::Usage(usage) => eprint!("{usage}"),
                _ => eprintln!("error: {err}"),
            }
            std::process::exit(err.exit_code());
        }
    }
}
