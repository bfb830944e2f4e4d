//! # BeerXML Extraction
//!
//! This module pulls the few fields the calculators need out of a BeerXML
//! recipe document: the fermentables, the total mash infusion volume and the
//! pre-boil volume of the first recipe.
//!
//! ## Usage
//!
//! ```rust
//! use brewmate::beerxml::parse_recipe;
//!
//! let xml = "<RECIPES><RECIPE><BOIL_SIZE>25.0</BOIL_SIZE><FERMENTABLES>\
//!            <FERMENTABLE><NAME>Pilsner</NAME><TYPE>Grain</TYPE><AMOUNT>5.0</AMOUNT></FERMENTABLE>\
//!            </FERMENTABLES></RECIPE></RECIPES>";
//! let recipe = parse_recipe(xml)?;
//!
//! assert_eq!(recipe.fermentables.len(), 1);
//! assert_eq!(recipe.boil_size_l, Some(25.0));
//! # Ok::<(), brewmate::errors::BeerXmlError>(())
//! ```

use lazy_static::lazy_static;
use log::{debug, info, trace, warn};
use regex::Regex;
use std::fs;
use std::path::Path;

use crate::brewing_types::{FermentableKind, MaltRecord};
use crate::errors::BeerXmlError;

lazy_static! {
    /// Any markup construct: tags, comments, declarations, processing instructions
    static ref MARKUP: Regex =
        Regex::new(r"(?s)<!--.*?-->|<!\[CDATA\[.*?\]\]>|<[?!][^>]*>|<(/?)([A-Za-z_][\w.\-:]*)[^>]*?(/?)>")
            .expect("Markup pattern should be valid");
    static ref FERMENTABLE_BLOCK: Regex =
        Regex::new(r"(?s)<FERMENTABLE(?:\s[^>]*)?>(.*?)</FERMENTABLE>")
            .expect("Fermentable pattern should be valid");
    static ref MASH_STEP_BLOCK: Regex =
        Regex::new(r"(?s)<MASH_STEP(?:\s[^>]*)?>(.*?)</MASH_STEP>")
            .expect("Mash step pattern should be valid");
    static ref RECIPE_BLOCK: Regex =
        Regex::new(r"(?s)<RECIPE(?:\s[^>]*)?>(.*?)</RECIPE>")
            .expect("Recipe pattern should be valid");
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?")
            .expect("Number pattern should be valid");
    static ref CHARACTER_REFERENCE: Regex =
        Regex::new(r"&#(?:[xX]([0-9A-Fa-f]+)|([0-9]+));")
            .expect("Character reference pattern should be valid");
    static ref DECLARED_ENCODING: Regex =
        Regex::new(r#"^\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._\-]+)["']"#)
            .expect("Encoding declaration pattern should be valid");
}

/// Fields extracted from a BeerXML document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeExtract {
    /// Every fermentable with a name, a type and a numeric amount, in document order
    pub fermentables: Vec<MaltRecord>,
    /// Sum of the positive mash step infusion amounts, if any step has one
    pub mash_infuse_volume_l: Option<f64>,
    /// `BOIL_SIZE` of the first recipe
    pub boil_size_l: Option<f64>,
}

/// Parse a BeerXML document held in memory
pub fn parse_recipe(xml: &str) -> Result<RecipeExtract, BeerXmlError> {
    check_well_formed(xml)?;

    let fermentables = extract_fermentables(xml);
    let mash_infuse_volume_l = extract_mash_infuse_volume(xml);
    let boil_size_l = RECIPE_BLOCK
        .captures(xml)
        .and_then(|c| first_tag_text(c.get(1).map_or("", |m| m.as_str()), "BOIL_SIZE"))
        .and_then(|text| parse_leading_number(&text));

    info!(
        "Parsed BeerXML: {} fermentables, mash volume {:?}, boil size {:?}",
        fermentables.len(),
        mash_infuse_volume_l,
        boil_size_l
    );

    Ok(RecipeExtract {
        fermentables,
        mash_infuse_volume_l,
        boil_size_l,
    })
}

/// Read and parse a BeerXML file
pub fn load_recipe_file<P: AsRef<Path>>(path: P) -> Result<RecipeExtract, BeerXmlError> {
    let content = read_recipe_document(path)?;
    parse_recipe(&content)
}

/// Read a BeerXML file as text, whatever its encoding.
///
/// UTF-8 is tried first. Otherwise the bytes are decoded as Latin-1 when the
/// prolog declares ISO-8859-1 (or its Windows superset), and lossily as UTF-8
/// in any other case.
pub fn read_recipe_document<P: AsRef<Path>>(path: P) -> Result<String, BeerXmlError> {
    let path = path.as_ref();
    debug!("Loading BeerXML file {}", path.display());

    let bytes = fs::read(path).map_err(|e| BeerXmlError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(decode_document(bytes))
}

fn decode_document(bytes: Vec<u8>) -> String {
    let bytes = match String::from_utf8(bytes) {
        Ok(text) => return text,
        Err(e) => e.into_bytes(),
    };

    let prolog = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let encoding = DECLARED_ENCODING
        .captures(&prolog)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase());

    match encoding.as_deref() {
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "windows-1252" | "cp1252") => {
            debug!("Decoding BeerXML document as Latin-1");
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        other => {
            warn!("BeerXML document is not valid UTF-8 (declared {:?}), decoding lossily", other);
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }
}

/// Reject documents whose elements are not properly nested
fn check_well_formed(xml: &str) -> Result<(), BeerXmlError> {
    if xml.trim().is_empty() {
        return Err(BeerXmlError::Malformed("empty document".to_string()));
    }

    let mut open_tags: Vec<&str> = Vec::new();
    let mut root_count = 0;

    for capture in MARKUP.captures_iter(xml) {
        let Some(name) = capture.get(2).map(|m| m.as_str()) else {
            continue; // comment, declaration or CDATA
        };
        let is_closing = capture.get(1).is_some_and(|m| !m.as_str().is_empty());
        let is_self_closing = capture.get(3).is_some_and(|m| !m.as_str().is_empty());

        if is_closing {
            match open_tags.pop() {
                Some(open) if open == name => {}
                Some(open) => {
                    return Err(BeerXmlError::Malformed(format!(
                        "</{name}> closes <{open}>"
                    )))
                }
                None => return Err(BeerXmlError::Malformed(format!("unexpected </{name}>"))),
            }
        } else {
            if open_tags.is_empty() {
                root_count += 1;
            }
            if !is_self_closing {
                open_tags.push(name);
            }
        }
    }

    if let Some(open) = open_tags.last() {
        return Err(BeerXmlError::Malformed(format!("<{open}> is never closed")));
    }
    if root_count != 1 {
        return Err(BeerXmlError::Malformed(format!(
            "expected a single root element, found {root_count}"
        )));
    }
    Ok(())
}

fn extract_fermentables(xml: &str) -> Vec<MaltRecord> {
    let mut records = Vec::new();

    for block in FERMENTABLE_BLOCK.captures_iter(xml) {
        let body = block.get(1).map_or("", |m| m.as_str());
        let (Some(name), Some(kind), Some(amount)) = (
            first_tag_text(body, "NAME"),
            first_tag_text(body, "TYPE"),
            first_tag_text(body, "AMOUNT"),
        ) else {
            trace!("Skipping fermentable without NAME/TYPE/AMOUNT");
            continue;
        };

        let weight_kg = match parse_leading_number(&amount) {
            Some(weight) => weight,
            None => {
                warn!("Fermentable '{}' has a non-numeric amount '{}'", name, amount);
                f64::NAN
            }
        };
        records.push(MaltRecord::new(&name, FermentableKind::from_tag(&kind), weight_kg));
    }

    records
}

fn extract_mash_infuse_volume(xml: &str) -> Option<f64> {
    let amounts: Vec<f64> = MASH_STEP_BLOCK
        .captures_iter(xml)
        .filter_map(|step| first_tag_text(step.get(1).map_or("", |m| m.as_str()), "INFUSE_AMOUNT"))
        .filter_map(|text| parse_leading_number(&text))
        .filter(|amount| *amount > 0.0)
        .collect();

    if amounts.is_empty() {
        None
    } else {
        Some(amounts.iter().sum())
    }
}

/// Text of the first `<tag>` element inside `body`, entities decoded.
/// Empty elements count as missing.
fn first_tag_text(body: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = body.find(&open)? + open.len();
    let end = start + body[start..].find(&close)?;
    let text = decode_entities(&body[start..end]);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn decode_entities(text: &str) -> String {
    let text = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'");
    // Must run before &amp; so "&amp;#233;" stays literal
    let text = CHARACTER_REFERENCE.replace_all(&text, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(decimal)) => decimal.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    text.replace("&amp;", "&")
}

/// Parse the leading decimal number of `text` ("4.5 kg" gives 4.5)
fn parse_leading_number(text: &str) -> Option<f64> {
    LEADING_NUMBER
        .find(text.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
