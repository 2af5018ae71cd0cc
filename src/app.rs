use clap::Arg;

pub struct App {
    input_path: String,
    output_path: String,
    lots_path: String,
    conf_path: String,
}

impl App {
    pub fn new() -> App {
        let matches = clap::App::new("capgains")
            .version("0.1.0")
            .about("Annotates trade statements with FIFO realized capital gains")
            .arg(Arg::with_name("input_path")
                .short("i")
                .long("input")
                .takes_value(true)
                .help("Trade file to process"))
            .arg(Arg::with_name("output_path")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Annotated gains statement to write"))
            .arg(Arg::with_name("lots_path")
                .short("l")
                .long("lots")
                .takes_value(true)
                .help("Open-lot carry-forward snapshot to write"))
            .arg(Arg::with_name("config_path")
                .short("c")
                .long("config")
                .takes_value(true)
                .help("Config file"))
            .get_matches();

        App {
            input_path: matches.value_of("input_path")
                .unwrap_or("trades.csv")
                .to_string(),
            output_path: matches.value_of("output_path")
                .unwrap_or("gains.csv")
                .to_string(),
            lots_path: matches.value_of("lots_path")
                .unwrap_or("open_lots.csv")
                .to_string(),
            conf_path: matches.value_of("config_path")
                .unwrap_or("capgains.yaml")
                .to_string(),
        }
    }

    pub fn get_config_path(&self) -> &str { &self.conf_path }
    pub fn get_input_path(&self) -> &str { &self.input_path }
    pub fn get_output_path(&self) -> &str { &self.output_path }
    pub fn get_lots_path(&self) -> &str { &self.lots_path }
}
