use clap::{App, Arg};
use env_logger::Env;
use flate2::read::GzDecoder;
use log::{error, info};
use seqnbt::stream::{CompoundReader, Lazy, ListReader, Parser};
use std::io::{self, Read};

//
// Dumps NBT from a file or stdin. Compounds and lists are walked lazily, so
// entries named with --skip are never decoded.
//

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

struct Dump {
    skip: Vec<String>,
}

impl Dump {
    fn value<R: Read>(&self, lazy: Lazy<R>, indent: usize) -> Result<()> {
        match lazy {
            Lazy::Value(v) => println!("{:?}", v),
            Lazy::Compound(mut c) => {
                println!("{{");
                self.compound(&mut c, indent + 4)?;
                println!("{:indent$}}}", "", indent = indent);
            }
            Lazy::List(mut l) => {
                println!("[{:?}; {}]", l.element_tag(), l.remaining());
                self.list(&mut l, indent + 4)?;
            }
        }
        Ok(())
    }

    fn compound<R: Read>(&self, c: &mut CompoundReader<R>, indent: usize) -> Result<()> {
        while c.has_next()? {
            let (name, value) = c.next()?;
            print!("{:indent$}{}: ", "", name, indent = indent);

            if self.skip.contains(&name) && value.tag().is_container() {
                value.skip()?;
                println!("<skipped>");
                continue;
            }

            self.value(value, indent)?;
        }
        Ok(())
    }

    fn list<R: Read>(&self, l: &mut ListReader<R>, indent: usize) -> Result<()> {
        let mut i = 0;
        while l.has_next()? {
            print!("{:indent$}{}: ", "", i, indent = indent);
            let value = l.next()?;
            self.value(value, indent)?;
            i += 1;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt-dump")
        .about("Print NBT data without decoding what is not asked for")
        .arg(
            Arg::with_name("file")
                .takes_value(true)
                .required(false)
                .help("file to read, stdin if absent"),
        )
        .arg(
            Arg::with_name("gzip")
                .long("gzip")
                .short("z")
                .takes_value(false)
                .required(false)
                .help("input is gzip compressed"),
        )
        .arg(
            Arg::with_name("skip")
                .long("skip")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .required(false)
                .help("name of compound entries to skip"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .required(false)
                .help("decode each root value fully and print it as JSON"),
        )
        .get_matches();

    let input: Box<dyn Read> = match matches.value_of("file") {
        Some(path) => Box::new(io::BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(io::stdin()),
    };

    let input: Box<dyn Read> = match matches.is_present("gzip") {
        true => Box::new(GzDecoder::new(input)),
        false => input,
    };

    let dump = Dump {
        skip: matches
            .values_of("skip")
            .map(|names| names.map(str::to_owned).collect())
            .unwrap_or_default(),
    };
    let json = matches.is_present("json");

    let mut parser = Parser::new(input);
    let mut roots = 0;

    loop {
        let root = match parser.root() {
            Ok(Some(root)) => root,
            Ok(None) => {
                println!("<end>");
                continue;
            }
            Err(e) if e.is_eof() => break,
            Err(e) => {
                error!("{}", e);
                return Err(e.into());
            }
        };
        roots += 1;

        if json {
            let value = root.read_fully()?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            dump.value(root, 0)?;
        }
    }

    info!("read {} root values", roots);
    parser.close();
    Ok(())
}
