// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared fixtures: tiny PDFs written with lopdf, and scripted OCR doubles.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, dictionary};
use pagesift_core::types::{AttemptOutcome, Document as Pdf, ExtractionMethod};
use pagesift_document::ocr::OcrStrategy;

/// Write a PDF with one page per entry of `pages`. `None` gives a page with no
/// text operators at all, i.e. what a scan without a text layer looks like.
pub fn write_pdf(path: &Path, pages: &[Option<&str>]) {
    let mut doc = Document::with_version("1.4");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = match page {
            Some(text) => format!("BT /F1 12 Tf 100 700 Td ({text}) Tj ET"),
            None => "0 0 m 100 100 l S".to_string(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => font_id,
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("write test pdf");
}

pub fn text_pdf(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    write_pdf(&path, &[Some(text)]);
    path
}

pub fn scanned_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    write_pdf(&path, &[None]);
    path
}

/// A text PDF encrypted (RC4, V2) with an empty user password.
pub fn encrypted_text_pdf(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = text_pdf(dir, name, text);
    let mut doc = Document::load(&path).expect("reload test pdf");
    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "",
        key_length: 128,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).expect("encryption state");
    doc.encrypt(&state).expect("encrypt test pdf");
    doc.save(&path).expect("write encrypted pdf");
    path
}

/// Two text pages; the second page's content stream ends in an inline image
/// with no image dictionary, which content parsing rejects.
pub fn broken_page_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    write_pdf(&path, &[Some("Intact first page"), Some("Lost second page")]);

    let mut doc = Document::load(&path).expect("reload test pdf");
    let second = *doc.get_pages().get(&2).expect("second page");
    let content_id = doc.get_page_contents(second)[0];
    let stream = doc
        .get_object_mut(content_id)
        .and_then(Object::as_stream_mut)
        .expect("content stream");
    stream.set_content(b"BT /F1 12 Tf 100 700 Td (Lost second page) Tj ET BI garbage".to_vec());
    doc.save(&path).expect("write broken pdf");
    path
}

pub fn corrupt_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4\n1 0 obj << /Type /Catalog garbage").expect("write corrupt pdf");
    path
}

/// OCR variant that "reads" fixed text and counts how often it was asked.
pub struct ScriptedOcr {
    pub method: ExtractionMethod,
    pub text: Option<String>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedOcr {
    pub fn reading(text: &str) -> (Box<dyn OcrStrategy>, Arc<AtomicUsize>) {
        Self::build(Some(text.to_string()))
    }

    pub fn blank() -> (Box<dyn OcrStrategy>, Arc<AtomicUsize>) {
        Self::build(None)
    }

    fn build(text: Option<String>) -> (Box<dyn OcrStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let ocr = ScriptedOcr {
            method: ExtractionMethod::OcrTesseract,
            text,
            calls: Arc::clone(&calls),
        };
        (Box::new(ocr), calls)
    }
}

impl OcrStrategy for ScriptedOcr {
    fn method(&self) -> ExtractionMethod {
        self.method
    }

    fn is_available(&self) -> bool {
        true
    }

    fn availability_hint(&self) -> String {
        "scripted".into()
    }

    fn recognize(&self, _document: &Pdf) -> AttemptOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.text {
            Some(text) => AttemptOutcome::Success(text.clone()),
            None => AttemptOutcome::EmptyResult,
        }
    }
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
