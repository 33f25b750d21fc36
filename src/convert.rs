//! Conversion jobs
//!
//! A job names where code comes from (an inline block, a file, a directory of
//! `.txt` files) and where the document goes. Directory jobs produce either
//! one document per file or a single document with a page per file.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::colors::ColorResolver;
use crate::docx::Document;
use crate::error::{ConvertError, Result};
use crate::formatter::ExternalFormatter;
use crate::mapping::MappingRecord;
use crate::render::{RenderOptions, RenderedCode, Renderer};
use crate::syntax::PythonLexer;

/// Output path used when none is given
pub const DEFAULT_OUTPUT: &str = "codetoword.docx";

/// Extension of source files picked up from directories
pub const SOURCE_EXTENSION: &str = "txt";

/// Heading level of per-file headings in single-document mode
const FILE_HEADING_LEVEL: u8 = 3;

/// One unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Code given on the command line
    CodeBlock { code: String, output: PathBuf },
    /// A single source file
    File { input: PathBuf, output: PathBuf },
    /// Every `.txt` file of a directory
    Directory {
        dir: PathBuf,
        output: PathBuf,
        single_doc: bool,
        header: bool,
    },
}

/// Turns code into documents
pub struct Converter {
    lexer: PythonLexer,
    resolver: ColorResolver,
    options: RenderOptions,
    formatter: Option<ExternalFormatter>,
    echo: bool,
}

impl Converter {
    pub fn new(
        resolver: ColorResolver,
        options: RenderOptions,
        formatter: Option<ExternalFormatter>,
    ) -> Result<Self> {
        Ok(Self {
            lexer: PythonLexer::new()?,
            resolver,
            options,
            formatter,
            echo: true,
        })
    }

    /// Echo mapped tokens to stdout (on by default)
    #[cfg(test)]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Run a job to completion
    pub fn run(&self, job: &Job) -> Result<()> {
        match job {
            Job::CodeBlock { code, output } => self.convert_code(code, output),
            Job::File { input, output } => self.convert_file(input, &output_for_input(input, output)),
            Job::Directory {
                dir,
                output,
                single_doc: false,
                ..
            } => self.convert_directory(dir, output),
            Job::Directory {
                dir,
                output,
                single_doc: true,
                header,
            } => {
                let files = collect_source_files(dir)?;
                self.convert_into_one(&files, output, *header).map(|_| ())
            }
        }
    }

    /// Run jobs in order
    ///
    /// A job whose input is missing, unreadable or rejected by the formatter
    /// is reported and the remaining jobs still run. Returns how many jobs
    /// were skipped that way.
    pub fn run_all(&self, jobs: &[Job]) -> Result<usize> {
        let mut skipped = 0;
        for job in jobs {
            if let Err(e) = self.run(job) {
                if !e.is_input_error() {
                    return Err(e);
                }
                eprintln!("Error: {}", e);
                skipped += 1;
            }
        }
        Ok(skipped)
    }

    /// Convert a block of code into a document at `output`
    pub fn convert_code(&self, code: &str, output: &Path) -> Result<()> {
        let rendered = self.render(code)?;

        let mut doc = Document::new();
        doc.add_table(rendered.table);
        self.save(&doc, rendered.mapping.as_ref(), output)
    }

    /// Convert one source file
    pub fn convert_file(&self, input: &Path, output: &Path) -> Result<()> {
        let code = read_source(input)?;
        self.convert_code(&code, output)
    }

    /// Convert every source file of `dir` into its own document
    ///
    /// Documents go beside their sources, or into `output` when that is an
    /// existing directory. Files that cannot be read or formatted are
    /// reported and skipped.
    pub fn convert_directory(&self, dir: &Path, output: &Path) -> Result<()> {
        for file in collect_source_files(dir)? {
            let target = output_in_dir(&file, output);
            if let Err(e) = self.convert_file(&file, &target) {
                if !e.is_input_error() {
                    return Err(e);
                }
                eprintln!("Error: {}", e);
            }
        }
        Ok(())
    }

    /// Convert `files` into one document, a page per file
    ///
    /// With the default output path the document is named after the first
    /// file converted. Returns the path written, or None when no file could
    /// be converted.
    pub fn convert_into_one(&self, files: &[PathBuf], output: &Path, header: bool) -> Result<Option<PathBuf>> {
        let mut doc = Document::new();
        let mut mapping = self.options.map.then(MappingRecord::new);
        let mut target = (output != Path::new(DEFAULT_OUTPUT)).then(|| output.to_path_buf());

        for file in files {
            let rendered = match read_source(file).and_then(|code| self.render(&code)) {
                Ok(rendered) => rendered,
                Err(e) if e.is_input_error() => {
                    eprintln!("Error: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            target.get_or_insert_with(|| file.with_extension("docx"));
            if header {
                let path = fs::canonicalize(file).unwrap_or_else(|_| file.clone());
                doc.add_heading(&path.display().to_string(), FILE_HEADING_LEVEL);
            }
            doc.add_table(rendered.table);
            doc.add_page_break();
            if let (Some(all), Some(part)) = (mapping.as_mut(), rendered.mapping) {
                all.extend(part);
            }
        }

        let Some(target) = target.filter(|_| !doc.blocks().is_empty()) else {
            warn!("No source files could be converted");
            return Ok(None);
        };
        self.save(&doc, mapping.as_ref(), &target)?;
        Ok(Some(target))
    }

    /// Format (when configured) and render `code`
    fn render(&self, code: &str) -> Result<RenderedCode> {
        let code = self.prepare(code)?;
        Renderer::new(&self.lexer, &self.resolver, &self.options)
            .with_echo(self.echo)
            .render(&code)
    }

    fn prepare<'c>(&self, code: &'c str) -> Result<Cow<'c, str>> {
        match &self.formatter {
            Some(formatter) => {
                debug!("Validating with {}", formatter.program());
                Ok(Cow::Owned(formatter.format(code)?))
            }
            None => Ok(Cow::Borrowed(code)),
        }
    }

    fn save(&self, doc: &Document, mapping: Option<&MappingRecord>, output: &Path) -> Result<()> {
        if let Some(mapping) = mapping {
            let path = mapping.save_beside(output)?;
            info!("Mapping of {} lines written to {}", mapping.lines().len(), path.display());
        }
        doc.save(output)?;
        println!("{} Document saved successfully", output.display());
        Ok(())
    }
}

/// Read a source file, telling a missing file apart from other failures
pub fn read_source(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConvertError::FileNotFound(path.display().to_string()),
        _ => ConvertError::Read {
            path: path.display().to_string(),
            source,
        },
    })
}

/// Decode code given as command-line words
///
/// Words are joined with spaces, a literal `\n` becomes a newline and any
/// other backslash is dropped.
pub fn decode_codeblock(words: &[String]) -> String {
    words.join(" ").replace("\\n", "\n").replace('\\', "")
}

/// Output for a single input file: `<input stem>.docx` unless one was given
pub fn output_for_input(input: &Path, output: &Path) -> PathBuf {
    if output == Path::new(DEFAULT_OUTPUT) {
        input.with_extension("docx")
    } else {
        output.to_path_buf()
    }
}

/// Output for a file converted as part of a directory
pub fn output_in_dir(file: &Path, output: &Path) -> PathBuf {
    match file.file_stem() {
        Some(stem) if output.is_dir() => output.join(format!("{}.docx", stem.to_string_lossy())),
        _ => file.with_extension("docx"),
    }
}

/// The `.txt` files directly inside `dir`, sorted by name
pub fn collect_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_source = path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION);
        if is_source && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorMap;
    use crate::config;
    use std::io::{Cursor, Read};

    fn converter(options: RenderOptions, formatter: Option<ExternalFormatter>) -> Converter {
        let resolver = ColorResolver::new(config::builtin_defaults().unwrap(), ColorMap::new(), Vec::new());
        Converter::new(resolver, options, formatter).unwrap().with_echo(false)
    }

    fn document_xml(path: &Path) -> String {
        let bytes = fs::read(path).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name("word/document.xml").unwrap();
        let mut xml = String::new();
        part.read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_decode_codeblock() {
        let words = vec!["def f():\\n".to_string(), "return 'a\\b'".to_string()];
        assert_eq!(decode_codeblock(&words), "def f():\n return 'ab'");
        assert_eq!(decode_codeblock(&[]), "");
    }

    #[test]
    fn test_output_for_input() {
        let input = Path::new("src/code.txt");
        assert_eq!(output_for_input(input, Path::new(DEFAULT_OUTPUT)), PathBuf::from("src/code.docx"));
        assert_eq!(output_for_input(input, Path::new("out.docx")), PathBuf::from("out.docx"));
    }

    #[test]
    fn test_output_in_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = Path::new("in/a.txt");
        assert_eq!(output_in_dir(file, dir.path()), dir.path().join("a.docx"));
        assert_eq!(output_in_dir(file, Path::new(DEFAULT_OUTPUT)), PathBuf::from("in/a.docx"));
    }

    #[test]
    fn test_collect_source_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b = 2").unwrap();
        fs::write(dir.path().join("a.txt"), "a = 1").unwrap();
        fs::write(dir.path().join("c.py"), "c = 3").unwrap();
        fs::create_dir(dir.path().join("d.txt")).unwrap();

        let files = collect_source_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt"), dir.path().join("b.txt")]);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_source(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound(_)));
    }

    #[test]
    fn test_file_job_defaults_output_beside_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("code.txt");
        fs::write(&input, "import os\n\nprint(os.name)\n").unwrap();

        let job = Job::File {
            input: input.clone(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        };
        converter(RenderOptions::default(), None).run(&job).unwrap();

        let xml = document_xml(&dir.path().join("code.docx"));
        assert_eq!(xml.matches("<w:tr>").count(), 4);
        assert!(!dir.path().join("mapping.json").exists());
    }

    #[test]
    fn test_code_block_with_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("block.docx");
        let options = RenderOptions {
            map: true,
            ..RenderOptions::default()
        };
        let job = Job::CodeBlock {
            code: "x = 1\ny = 2".to_string(),
            output: output.clone(),
        };
        converter(options, None).run(&job).unwrap();

        assert!(output.exists());
        let mapping: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("mapping.json")).unwrap()).unwrap();
        assert_eq!(mapping.as_array().unwrap().len(), 2);
        assert_eq!(mapping[1][0]["Token.Name"], "y");
    }

    #[test]
    fn test_missing_input_does_not_stop_code_block() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("block.docx");
        let jobs = vec![
            Job::File {
                input: dir.path().join("missing.txt"),
                output: output.clone(),
            },
            Job::CodeBlock {
                code: "x = 1".to_string(),
                output: output.clone(),
            },
        ];

        let skipped = converter(RenderOptions::default(), None).run_all(&jobs).unwrap();
        assert_eq!(skipped, 1);
        assert!(output.exists());
    }

    #[test]
    fn test_directory_job_one_document_per_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a = 1").unwrap();
        fs::write(dir.path().join("b.txt"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(dir.path().join("c.txt"), "c = 3").unwrap();
        let out = tempfile::tempdir().unwrap();

        let job = Job::Directory {
            dir: dir.path().to_path_buf(),
            output: out.path().to_path_buf(),
            single_doc: false,
            header: false,
        };
        converter(RenderOptions::default(), None).run(&job).unwrap();

        assert!(out.path().join("a.docx").exists());
        assert!(!out.path().join("b.docx").exists());
        assert!(out.path().join("c.docx").exists());
    }

    #[test]
    fn test_directory_job_single_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a = 1\nb = 2").unwrap();
        fs::write(dir.path().join("b.txt"), "c = 3").unwrap();
        let options = RenderOptions {
            map: true,
            ..RenderOptions::default()
        };

        let files = collect_source_files(dir.path()).unwrap();
        let written = converter(options, None)
            .convert_into_one(&files, Path::new(DEFAULT_OUTPUT), true)
            .unwrap()
            .unwrap();

        assert_eq!(written, dir.path().join("a.docx"));
        let xml = document_xml(&written);
        assert_eq!(xml.matches("<w:tbl>").count(), 2);
        assert_eq!(xml.matches(r#"<w:pStyle w:val="Heading3"/>"#).count(), 2);
        assert_eq!(xml.matches(r#"<w:br w:type="page"/>"#).count(), 2);
        assert!(xml.contains("a.txt"));

        let mapping: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("mapping.json")).unwrap()).unwrap();
        assert_eq!(mapping.as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_single_document_with_nothing_to_convert() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![dir.path().join("absent.txt")];
        let written = converter(RenderOptions::default(), None)
            .convert_into_one(&files, &dir.path().join("all.docx"), false)
            .unwrap();
        assert_eq!(written, None);
        assert!(!dir.path().join("all.docx").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_formatter_runs_before_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("fmt.docx");
        let formatter = ExternalFormatter::from_command_line("tr a b");
        converter(RenderOptions::default(), formatter)
            .convert_code("a = 1", &output)
            .unwrap();

        let xml = document_xml(&output);
        assert!(xml.contains(">b</w:t>"));
        assert!(!xml.contains(">a</w:t>"));
    }
}
