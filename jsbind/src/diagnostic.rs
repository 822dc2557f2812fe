//!
//! Diagnostic Module - Expansion Error Reporting
//!
//! Turns recovered expansion failures (`Expr::Invalid` nodes) and unknown
//! connected keys into miette reports pointing at the invoking call site.
//!
//! Usage:
//!   let reporter = DiagnosticReporter::new(&source_file);
//!   reporter.report_invalid(&collect_invalid(&expr));
//!

use miette::{Diagnostic, LabeledSpan, NamedSource, Report, SourceSpan};
use thiserror::Error;

use crate::error::BackendError;
use crate::js::Expr;
use crate::source::{SourceFile, Span};

/// A garbage node found in a translated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNode {
    pub span: Span,
    pub message: String,
}

/// Every `Expr::Invalid` under `expr`, outermost first.
pub fn collect_invalid(expr: &Expr) -> Vec<InvalidNode> {
    let mut found = Vec::new();
    expr.walk(&mut |e| {
        if let Expr::Invalid { span, message } = e {
            found.push(InvalidNode { span: *span, message: message.clone() });
        }
    });
    found
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExpansionDiagnostic {
    message: String,
    src: NamedSource<String>,
    span: SourceSpan,
    label: String,
    help_text: Option<String>,
}

impl Diagnostic for ExpansionDiagnostic {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            Some(self.label.clone()),
            self.span,
        ))))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help_text
            .as_ref()
            .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>)
    }
}

fn source_span(span: Span) -> SourceSpan {
    (span.start as usize, span.len() as usize).into()
}

impl ExpansionDiagnostic {
    pub fn from_invalid(node: &InvalidNode, source: &SourceFile) -> Self {
        let (line, col) = source.line_col(node.span.start);

        Self {
            message: format!("cannot translate call at {}:{}", line, col),
            src: NamedSource::new(&source.name, source.source.to_string()),
            span: source_span(node.span),
            label: node.message.clone(),
            help_text: None,
        }
    }

    /// Only errors that carry a source position have a diagnostic.
    pub fn from_backend_error(err: &BackendError, source: &SourceFile) -> Option<Self> {
        match err {
            BackendError::UnknownConnectedKey { key, span } => {
                let (line, col) = source.line_col(span.start);
                Some(Self {
                    message: format!("{} at {}:{}", err, line, col),
                    src: NamedSource::new(&source.name, source.source.to_string()),
                    span: source_span(*span),
                    label: format!("no binding for '{}'", key),
                    help_text: Some("check the member name or add a binding for it".to_string()),
                })
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

pub struct DiagnosticReporter<'a> {
    source: &'a SourceFile,
}

impl<'a> DiagnosticReporter<'a> {
    pub fn new(source: &'a SourceFile) -> Self {
        Self { source }
    }

    pub fn report_invalid(&self, nodes: &[InvalidNode]) {
        for node in nodes {
            let report = Report::new(ExpansionDiagnostic::from_invalid(node, self.source));
            eprintln!("{:?}", report);
        }
    }

    pub fn report_backend_error(&self, err: &BackendError) {
        match ExpansionDiagnostic::from_backend_error(err, self.source) {
            Some(diag) => eprintln!("{:?}", Report::new(diag)),
            None => eprintln!("error: {}", err),
        }
    }
}
