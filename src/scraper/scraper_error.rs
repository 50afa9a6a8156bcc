use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTML parse error: {0}")]
    HtmlParse(String),
    #[error("Unexpected page shape: {0}")]
    UnexpectedShape(String),
}
