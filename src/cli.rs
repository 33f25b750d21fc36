//! Command-line interface

use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Parser};

use crate::colors::{parse_user_map, CategoryOverride, ColorMap, ColorResolver};
use crate::config::{self, DEFAULT_CONFIG_FILE};
use crate::convert::{decode_codeblock, Job, DEFAULT_OUTPUT};
use crate::error::Result;
use crate::formatter::{ExternalFormatter, DEFAULT_FORMATTER};
use crate::render::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "codetodocx", version)]
#[command(about = "Convert Python source code into a syntax-colored Word document")]
#[command(group(ArgGroup::new("source").required(true).multiple(true).args(["input", "codeblock"])))]
pub struct Cli {
    /// Source file, or a directory of .txt source files
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Code given inline; a literal \n starts a new line
    #[arg(short, long, num_args = 1..)]
    pub codeblock: Vec<String>,

    /// Output document
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Run the code through the formatter before rendering
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, value_parser = parse_bool,
          num_args = 0..=1, default_value = "no", default_missing_value = "yes")]
    pub validate: bool,

    /// Formatter command used by --validate
    #[arg(long, default_value = DEFAULT_FORMATTER)]
    pub formatter: String,

    #[arg(long, value_name = "BOOL", action = ArgAction::Set, value_parser = parse_bool,
          num_args = 0..=1, default_value = "no", default_missing_value = "yes")]
    pub bold: bool,

    #[arg(long, num_args = 1.., default_value = "Consolas")]
    pub fontname: Vec<String>,

    /// Font size in points
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u16).range(1..=1638))]
    pub fontsize: u16,

    /// Word table style
    #[arg(long, num_args = 1.., default_value = "Light Shading Accent 1")]
    pub style: Vec<String>,

    /// Category to color map, e.g. {'token.keyword': '#FF0000'}
    #[arg(long, num_args = 1..)]
    pub colorcodes: Vec<String>,

    #[arg(long, value_name = "HEX")]
    pub keyword: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub class: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub function: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub number: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub comment: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub string: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub decorator: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub exception: Option<String>,
    #[arg(long, value_name = "HEX")]
    pub operator: Option<String>,

    /// Put every file of a directory into one document
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, value_parser = parse_bool,
          num_args = 0..=1, default_value = "no", default_missing_value = "yes")]
    pub singledoc: bool,

    /// Head each file of a single document with its path
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, value_parser = parse_bool,
          num_args = 0..=1, default_value = "no", default_missing_value = "yes")]
    pub header: bool,

    /// Write mapping.json and echo each token
    #[arg(long, value_name = "BOOL", action = ArgAction::Set, value_parser = parse_bool,
          num_args = 0..=1, default_value = "no", default_missing_value = "yes")]
    pub map: bool,

    /// Default color configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    pub color_config: PathBuf,
}

impl Cli {
    /// Override flags that were given, in precedence order
    pub fn overrides(&self) -> Vec<(CategoryOverride, String)> {
        CategoryOverride::ALL
            .into_iter()
            .filter_map(|category| {
                let color = match category {
                    CategoryOverride::Keyword => &self.keyword,
                    CategoryOverride::Class => &self.class,
                    CategoryOverride::Function => &self.function,
                    CategoryOverride::Number => &self.number,
                    CategoryOverride::Comment => &self.comment,
                    CategoryOverride::String => &self.string,
                    CategoryOverride::Decorator => &self.decorator,
                    CategoryOverride::Exception => &self.exception,
                    CategoryOverride::Operator => &self.operator,
                };
                color.clone().map(|color| (category, color))
            })
            .collect()
    }

    pub fn user_colors(&self) -> ColorMap {
        if self.colorcodes.is_empty() {
            ColorMap::new()
        } else {
            parse_user_map(&self.colorcodes.join(" "))
        }
    }

    /// Resolver built from the color config file, --colorcodes and overrides
    pub fn resolver(&self) -> Result<ColorResolver> {
        let defaults = config::load_defaults(&self.color_config)?;
        Ok(ColorResolver::new(defaults, self.user_colors(), self.overrides()))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            font_name: self.fontname.join(" "),
            font_size: self.fontsize,
            bold: self.bold,
            table_style: self.style.join(" "),
            map: self.map,
        }
    }

    pub fn formatter(&self) -> Option<ExternalFormatter> {
        if self.validate {
            ExternalFormatter::from_command_line(&self.formatter)
        } else {
            None
        }
    }

    /// Jobs to run: the input (file or directory) first, then the code block
    pub fn jobs(&self) -> Vec<Job> {
        let mut jobs = Vec::new();

        if let Some(input) = &self.input {
            if input.is_dir() {
                jobs.push(Job::Directory {
                    dir: input.clone(),
                    output: self.output.clone(),
                    single_doc: self.singledoc,
                    header: self.header,
                });
            } else {
                jobs.push(Job::File {
                    input: input.clone(),
                    output: self.output.clone(),
                });
            }
        }

        if !self.codeblock.is_empty() {
            jobs.push(Job::CodeBlock {
                code: decode_codeblock(&self.codeblock),
                output: self.output.clone(),
            });
        }

        jobs
    }
}

/// Parse a boolean option value
fn parse_bool(s: &str) -> std::result::Result<bool, String> {
    match s.to_lowercase().as_str() {
        "yes" | "true" | "t" | "1" => Ok(true),
        "no" | "false" | "f" | "0" => Ok(false),
        _ => Err("Boolean value expected.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("codetodocx").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("Yes"), Ok(true));
        assert_eq!(parse_bool("T"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert_eq!(parse_bool("false"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_source_required() {
        assert!(Cli::try_parse_from(["codetodocx"]).is_err());
        assert!(Cli::try_parse_from(["codetodocx", "--bold"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-c", "x = 1"]);
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(cli.color_config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!cli.validate && !cli.bold && !cli.singledoc && !cli.header && !cli.map);
        assert_eq!(cli.render_options(), RenderOptions::default());
        assert!(cli.formatter().is_none());
        assert!(cli.overrides().is_empty());
        assert!(cli.user_colors().is_empty());
    }

    #[test]
    fn test_bool_flags() {
        let cli = parse(&["-c", "x", "--bold", "--map", "no", "--validate", "T"]);
        assert!(cli.bold);
        assert!(!cli.map);
        assert!(cli.validate);
        assert_eq!(cli.formatter().unwrap().program(), DEFAULT_FORMATTER);

        assert!(Cli::try_parse_from(["codetodocx", "-c", "x", "--bold", "maybe"]).is_err());
    }

    #[test]
    fn test_multi_word_values() {
        let cli = parse(&[
            "-c", "x", "--fontname", "Courier", "New", "--style", "Table", "Grid", "--fontsize", "12",
        ]);
        let options = cli.render_options();
        assert_eq!(options.font_name, "Courier New");
        assert_eq!(options.table_style, "Table Grid");
        assert_eq!(options.font_size, 12);

        assert!(Cli::try_parse_from(["codetodocx", "-c", "x", "--fontsize", "0"]).is_err());
    }

    #[test]
    fn test_colorcodes_words_are_joined() {
        let cli = parse(&["-c", "x", "--colorcodes", "{'token.keyword':", "'#FF0000'}"]);
        assert_eq!(cli.user_colors()["token.keyword"], "#FF0000");
    }

    #[test]
    fn test_overrides_in_precedence_order() {
        let cli = parse(&["-c", "x", "--string", "#00FF00", "--keyword", "#FF0000", "--class", "#0000FF"]);
        assert_eq!(
            cli.overrides(),
            vec![
                (CategoryOverride::Keyword, "#FF0000".to_string()),
                (CategoryOverride::Class, "#0000FF".to_string()),
                (CategoryOverride::String, "#00FF00".to_string()),
            ]
        );
    }

    #[test]
    fn test_codeblock_job() {
        let cli = parse(&["-c", "def f():\\n", "return 1", "-o", "out.docx"]);
        assert_eq!(
            cli.jobs(),
            vec![Job::CodeBlock {
                code: "def f():\n return 1".to_string(),
                output: PathBuf::from("out.docx"),
            }]
        );
    }

    #[test]
    fn test_input_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("code.txt");
        std::fs::write(&file, "x = 1").unwrap();

        let dir_arg = dir.path().to_str().unwrap();
        let cli = parse(&["-i", dir_arg, "--singledoc", "--header"]);
        assert_eq!(
            cli.jobs(),
            vec![Job::Directory {
                dir: dir.path().to_path_buf(),
                output: PathBuf::from(DEFAULT_OUTPUT),
                single_doc: true,
                header: true,
            }]
        );

        let file_arg = file.to_str().unwrap();
        let cli = parse(&["-i", file_arg, "-c", "y"]);
        let jobs = cli.jobs();
        assert_eq!(jobs.len(), 2);
        assert_eq!(
            jobs[0],
            Job::File {
                input: file.clone(),
                output: PathBuf::from(DEFAULT_OUTPUT),
            }
        );
        assert!(matches!(jobs[1], Job::CodeBlock { .. }));
    }

    #[test]
    fn test_resolver_reads_color_config() {
        let dir = tempfile::tempdir().unwrap();
        let conf = dir.path().join("color.conf");
        std::fs::write(&conf, "[default_colors]\ntoken.keyword = #123456\n").unwrap();

        let conf_arg = conf.to_str().unwrap();
        let cli = parse(&["-c", "x", "--color-config", conf_arg]);
        let resolver = cli.resolver().unwrap();
        assert_eq!(resolver.resolve_hex("Token.Keyword"), Some("#123456"));
    }
}
