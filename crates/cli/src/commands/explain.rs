//! `sts explain-error` and `sts resolve-image`: the two pure translations,
//! exposed for scripting and support.

use sts_client::StsConfig;
use sts_core::normalize::{classify, deciding_rule, normalize, Outcome};
use sts_core::SignatureImage;

use crate::{print_json, OutputFormat};

pub(crate) fn cmd_explain_error(message: Option<&str>, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    let sentence = normalize(message);
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({
            "input": message,
            "rule": deciding_rule(message),
            "verbatim": classify(message) == Outcome::Verbatim,
            "sentence": sentence,
        })),
        OutputFormat::Text => println!("{}", sentence),
    }
}

pub(crate) fn cmd_resolve_image(value: &str, config: &StsConfig, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    let image = SignatureImage::classify(value);
    let url = image.resolve(&config.api_base_url);
    match output {
        OutputFormat::Json => {
            let kind = match image {
                SignatureImage::Empty => "empty",
                SignatureImage::DataUrl(_) => "data-url",
                SignatureImage::RelativePath(_) => "relative",
                SignatureImage::Absolute(_) => "absolute",
            };
            print_json(&serde_json::json!({
                "input": value,
                "kind": kind,
                "url": url,
            }));
        }
        OutputFormat::Text => println!("{}", url),
    }
}
