use std::path::Path;

use ferroscreen_core::{narrative, ClassifiedSection};
use serde::Serialize;
use tokio::io::AsyncReadExt;

use crate::cli::ParseSummaryArgs;
use crate::error::CliError;

use super::{section_lines, CommandResult};

#[derive(Debug, Serialize)]
struct ParseSummaryResponseData {
    source: String,
    sections: Vec<ClassifiedSection>,
}

pub async fn run(args: &ParseSummaryArgs) -> Result<CommandResult, CliError> {
    let path = args.path.as_deref().filter(|path| *path != Path::new("-"));
    let text = read_narrative(path).await?;
    let source = path.map_or_else(|| String::from("stdin"), |path| path.display().to_string());

    sectioned(source, &text)
}

async fn read_narrative(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => {
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

fn sectioned(source: String, text: &str) -> Result<CommandResult, CliError> {
    let sections = narrative::parse_classified(Some(text));
    let table = if sections.is_empty() {
        vec![String::from("No sections found.")]
    } else {
        section_lines(&sections)
    };

    let mut result = CommandResult::ok(
        serde_json::to_value(ParseSummaryResponseData {
            source,
            sections: sections.clone(),
        })?,
        Vec::new(),
    )
    .with_table(table);

    if sections.is_empty() && !text.trim().is_empty() {
        result = result.with_warning("no headings recognised in narrative");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn reads_and_sections_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            "**1. Business Overview:** Makes widgets.\n**2. Key Risks:** Competition."
        )
        .expect("write narrative");

        let text = read_narrative(Some(file.path())).await.expect("readable");
        let result = sectioned(file.path().display().to_string(), &text).expect("sectioned");

        let sections = result.data["sections"].as_array().expect("sections array");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["title"], "Business Overview");
        assert_eq!(sections[0]["category"], "business");
        assert_eq!(sections[1]["content"], "Competition.");
        assert!(result.warnings.is_empty());
        assert!(result.endpoints.is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let error = read_narrative(Some(dir.path().join("absent.txt").as_path()))
            .await
            .expect_err("must fail");

        assert_eq!(error.exit_code(), 10);
    }

    #[test]
    fn plain_text_warns_without_sections() {
        let result = sectioned(String::from("stdin"), "Nothing to see here.").expect("sectioned");

        assert_eq!(result.table, ["No sections found."]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn empty_text_is_silent() {
        let result = sectioned(String::from("stdin"), "").expect("sectioned");
        assert!(result.warnings.is_empty());
    }
}
