// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer attribute catalog.
//
// The lifecycle asks an `AttributeCatalog` for the full set of printer
// attributes when a printer is created, stores the result, and releases it
// when the printer is torn down.  It never looks inside.  The
// `StandardCatalog` emits the IPP Everywhere attributes a label or office
// printer application advertises (RFC 8011 §5.4, PWG 5100.14).

use serde::Serialize;

use crate::driver::DriverData;

// ---------------------------------------------------------------------------
// IPP operation IDs (RFC 8011 §5.4.15, PWG 5100.7)
// ---------------------------------------------------------------------------

const OP_PRINT_JOB: i32 = 0x0002;
const OP_VALIDATE_JOB: i32 = 0x0004;
const OP_CREATE_JOB: i32 = 0x0005;
const OP_SEND_DOCUMENT: i32 = 0x0006;
const OP_CANCEL_JOB: i32 = 0x0008;
const OP_GET_JOB_ATTRIBUTES: i32 = 0x0009;
const OP_GET_JOBS: i32 = 0x000A;
const OP_GET_PRINTER_ATTRIBUTES: i32 = 0x000B;
const OP_SET_PRINTER_ATTRIBUTES: i32 = 0x0013;
const OP_CANCEL_MY_JOBS: i32 = 0x0039;
const OP_CLOSE_JOB: i32 = 0x003B;
const OP_IDENTIFY_PRINTER: i32 = 0x003C;

// ---------------------------------------------------------------------------
// IPP enum values
// ---------------------------------------------------------------------------

const ORIENT_PORTRAIT: i32 = 3;
const ORIENT_LANDSCAPE: i32 = 4;
const ORIENT_REVERSE_LANDSCAPE: i32 = 5;
const ORIENT_REVERSE_PORTRAIT: i32 = 6;
const ORIENT_NONE: i32 = 7;

const QUALITY_DRAFT: i32 = 3;
const QUALITY_NORMAL: i32 = 4;
const QUALITY_HIGH: i32 = 5;

/// A single attribute value, tagged with its IPP syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeValue {
    Charset(Vec<String>),
    Keyword(Vec<String>),
    MimeType(Vec<String>),
    NaturalLanguage(Vec<String>),
    Name(String),
    Text(String),
    Uri(String),
    Integer(Vec<i32>),
    Enum(Vec<i32>),
    Boolean(bool),
    Range(i32, i32),
}

/// Ordered set of named printer attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    attributes: Vec<(String, AttributeValue)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, replacing any existing value with the same name.
    pub fn insert(&mut self, name: &str, value: AttributeValue) -> &mut Self {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name.to_string(), value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> + '_ {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    // -- typed helpers used by catalog builders --

    fn keywords(&mut self, name: &str, values: &[&str]) -> &mut Self {
        self.insert(name, AttributeValue::Keyword(owned(values)))
    }

    fn keyword(&mut self, name: &str, value: &str) -> &mut Self {
        self.keywords(name, &[value])
    }

    fn integer(&mut self, name: &str, value: i32) -> &mut Self {
        self.insert(name, AttributeValue::Integer(vec![value]))
    }

    fn enums(&mut self, name: &str, values: &[i32]) -> &mut Self {
        self.insert(name, AttributeValue::Enum(values.to_vec()))
    }

    fn boolean(&mut self, name: &str, value: bool) -> &mut Self {
        self.insert(name, AttributeValue::Boolean(value))
    }

    fn range(&mut self, name: &str, low: i32, high: i32) -> &mut Self {
        self.insert(name, AttributeValue::Range(low, high))
    }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Everything a catalog builder may draw on for one printer.
#[derive(Debug, Clone, Copy)]
pub struct CatalogRequest<'a> {
    pub name: &'a str,
    pub uuid: &'a str,
    pub resource: &'a str,
    pub driver_name: &'a str,
    pub device_uri: &'a str,
    /// Driver data, when the driver resolved.
    pub driver: Option<&'a DriverData>,
    /// Negotiated `document-format-supported` list.
    pub document_formats: &'a [String],
    /// Upper bound of `job-k-octets-supported`.
    pub max_job_kilobytes: i32,
}

/// Builds the printer attribute set for a new printer.
pub trait AttributeCatalog: Send + Sync {
    fn build(&self, request: &CatalogRequest<'_>) -> AttributeSet;
}

/// The IPP Everywhere printer attribute catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalog;

impl AttributeCatalog for StandardCatalog {
    fn build(&self, request: &CatalogRequest<'_>) -> AttributeSet {
        let mut attrs = AttributeSet::new();

        attrs
            .insert("charset-configured", AttributeValue::Charset(owned(&["utf-8"])))
            .insert(
                "charset-supported",
                AttributeValue::Charset(owned(&["us-ascii", "utf-8"])),
            )
            .keywords("compression-supported", &["deflate", "gzip", "none"])
            .integer("copies-default", 1)
            .range("copies-supported", 1, 999)
            .insert(
                "document-format-default",
                AttributeValue::MimeType(owned(&["application/octet-stream"])),
            )
            .insert(
                "document-format-supported",
                AttributeValue::MimeType(request.document_formats.to_vec()),
            )
            .insert(
                "generated-natural-language-supported",
                AttributeValue::NaturalLanguage(owned(&["en"])),
            )
            .keyword("identify-actions-default", "sound")
            .keywords("identify-actions-supported", &["display", "sound"])
            .keywords("ipp-features-supported", &["ipp-everywhere"])
            .keywords("ipp-versions-supported", &["1.1", "2.0"])
            .keywords(
                "job-creation-attributes-supported",
                &[
                    "copies",
                    "document-format",
                    "document-name",
                    "ipp-attribute-fidelity",
                    "job-name",
                    "job-priority",
                    "media",
                    "media-col",
                    "multiple-document-handling",
                    "orientation-requested",
                    "print-color-mode",
                    "print-content-optimize",
                    "print-darkness",
                    "print-quality",
                    "print-speed",
                    "printer-resolution",
                ],
            )
            .boolean("job-ids-supported", true)
            .range("job-k-octets-supported", 0, request.max_job_kilobytes)
            .integer("job-priority-default", 50)
            .integer("job-priority-supported", 1)
            .insert("job-sheets-default", AttributeValue::Name("none".into()))
            .insert("job-sheets-supported", AttributeValue::Name("none".into()))
            .keywords(
                "media-col-supported",
                &[
                    "media-bottom-margin",
                    "media-left-margin",
                    "media-right-margin",
                    "media-size",
                    "media-size-name",
                    "media-source",
                    "media-top-margin",
                    "media-top-offset",
                    "media-tracking",
                    "media-type",
                ],
            )
            .keywords(
                "multiple-document-handling-supported",
                &[
                    "separate-documents-uncollated-copies",
                    "separate-documents-collated-copies",
                ],
            )
            .boolean("multiple-document-jobs-supported", false)
            .integer("multiple-operation-time-out", 60)
            .keyword("multiple-operation-time-out-action", "abort-job")
            .insert(
                "natural-language-configured",
                AttributeValue::NaturalLanguage(owned(&["en"])),
            )
            .enums(
                "operations-supported",
                &[
                    OP_PRINT_JOB,
                    OP_VALIDATE_JOB,
                    OP_CREATE_JOB,
                    OP_SEND_DOCUMENT,
                    OP_CANCEL_JOB,
                    OP_GET_JOB_ATTRIBUTES,
                    OP_GET_JOBS,
                    OP_GET_PRINTER_ATTRIBUTES,
                    OP_SET_PRINTER_ATTRIBUTES,
                    OP_CANCEL_MY_JOBS,
                    OP_CLOSE_JOB,
                    OP_IDENTIFY_PRINTER,
                ],
            )
            .enums("orientation-requested-default", &[ORIENT_NONE])
            .enums(
                "orientation-requested-supported",
                &[
                    ORIENT_PORTRAIT,
                    ORIENT_LANDSCAPE,
                    ORIENT_REVERSE_LANDSCAPE,
                    ORIENT_REVERSE_PORTRAIT,
                    ORIENT_NONE,
                ],
            )
            .keyword("pdl-override-supported", "attempted")
            .keyword("print-content-optimize-default", "auto")
            .keywords(
                "print-content-optimize-supported",
                &["auto", "graphic", "photo", "text-and-graphic", "text"],
            )
            .enums("print-quality-default", &[QUALITY_NORMAL])
            .enums(
                "print-quality-supported",
                &[QUALITY_DRAFT, QUALITY_NORMAL, QUALITY_HIGH],
            )
            .keyword("printer-get-attributes-supported", "document-format")
            .insert("printer-info", AttributeValue::Text(request.name.into()))
            .insert("printer-name", AttributeValue::Name(request.name.into()))
            .keywords(
                "printer-settable-attributes",
                &[
                    "copies-default",
                    "document-format-default",
                    "label-mode-configured",
                    "label-tear-off-configured",
                    "media-col-default",
                    "media-col-ready",
                    "media-default",
                    "media-ready",
                    "multiple-document-handling-default",
                    "orientation-requested-default",
                    "print-color-mode-default",
                    "print-content-optimize-default",
                    "print-darkness-default",
                    "print-quality-default",
                    "print-speed-default",
                    "printer-darkness-configured",
                    "printer-geo-location",
                    "printer-location",
                    "printer-organization",
                    "printer-organizational-unit",
                    "printer-resolution-default",
                ],
            )
            .insert(
                "printer-strings-languages-supported",
                AttributeValue::NaturalLanguage(owned(&["de", "en", "es", "fr", "it"])),
            )
            .insert("printer-uuid", AttributeValue::Uri(request.uuid.into()))
            .keywords("uri-authentication-supported", &["none", "basic"])
            .keywords("uri-security-supported", &["none", "tls"])
            .keywords("which-jobs-supported", &["completed", "not-completed", "all"]);

        // Driver-dependent attributes.  Without driver data the printer is
        // treated as a monochrome label printer.
        match request.driver {
            Some(driver) => {
                let caps = &driver.capabilities;
                let kinds: &[&str] = if caps.is_label_printer() {
                    &["labels", "receipt"]
                } else {
                    &["document"]
                };
                attrs
                    .keyword("print-color-mode-default", caps.color_space.default_color_mode())
                    .keywords("print-color-mode-supported", caps.color_space.color_modes())
                    .insert(
                        "printer-make-and-model",
                        AttributeValue::Text(caps.make_and_model.clone()),
                    )
                    .keywords("printer-kind", kinds)
                    .insert(
                        "pwg-raster-document-resolution-supported",
                        AttributeValue::Integer(
                            caps.resolutions_dpi.iter().map(|dpi| *dpi as i32).collect(),
                        ),
                    );
            }
            None => {
                attrs
                    .keyword("print-color-mode-default", "monochrome")
                    .keywords("print-color-mode-supported", &["bi-level", "monochrome"])
                    .keywords("printer-kind", &["labels", "receipt"]);
            }
        }

        attrs
    }
}
