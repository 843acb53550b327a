//! Pass document rendering
//!
//! Produces a printable PDF for an issued pass (visitor details, validity
//! window, embedded QR image) under the configured uploads directory. The
//! file is served back to clients via the /uploads static route.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
    models::{pass::Pass, visitor::Visitor},
    services::qr,
};

#[derive(Clone)]
pub struct DocumentsService {
    uploads_dir: PathBuf,
}

impl DocumentsService {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            uploads_dir: PathBuf::from(&config.uploads_dir),
        }
    }

    /// Render the pass PDF and return its path relative to the server root
    pub fn render_pass(&self, pass: &Pass, visitor: &Visitor) -> AppResult<String> {
        fs::create_dir_all(&self.uploads_dir)
            .map_err(|e| AppError::Internal(format!("Failed to create uploads dir: {}", e)))?;

        let (doc, page, layer) =
            PdfDocument::new("Visitor Pass", Mm(210.0), Mm(297.0), "Layer 1");
        let current_layer = doc.get_page(page).get_layer(layer);

        let title_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::Internal(format!("Failed to load PDF font: {}", e)))?;
        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::Internal(format!("Failed to load PDF font: {}", e)))?;

        current_layer.use_text("Visitor Pass", 20.0, Mm(78.0), Mm(270.0), &title_font);

        let lines = [
            format!("Pass ID: {}", pass.id),
            format!("Visitor: {}", visitor.name),
            format!("Phone: {}", visitor.phone.as_deref().unwrap_or("N/A")),
            format!("Valid From: {}", pass.valid_from.format("%Y-%m-%d")),
            format!("Valid To: {}", pass.valid_to.format("%Y-%m-%d")),
        ];
        let mut y = Mm(250.0);
        for line in &lines {
            current_layer.use_text(line.as_str(), 12.0, Mm(25.0), y, &body_font);
            y -= Mm(8.0);
        }

        current_layer.use_text("Scan at the security desk:", 12.0, Mm(25.0), Mm(200.0), &body_font);

        // Re-decode the QR PNG through printpdf's image re-export so the
        // pixel types line up with what Image expects.
        let png_bytes = qr::png_bytes_from_data_url(&pass.qr_code)?;
        let qr_image = printpdf::image_crate::load_from_memory(&png_bytes)
            .map_err(|e| AppError::Internal(format!("Failed to decode QR image: {}", e)))?;
        let pdf_image = Image::from_dynamic_image(&qr_image);
        pdf_image.add_to_layer(
            current_layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(65.0)),
                translate_y: Some(Mm(120.0)),
                ..Default::default()
            },
        );

        let file_name = format!("pass-{}.pdf", pass.id);
        let path = self.uploads_dir.join(&file_name);
        let file = File::create(&path)
            .map_err(|e| AppError::Internal(format!("Failed to create pass PDF: {}", e)))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| AppError::Internal(format!("Failed to write pass PDF: {}", e)))?;

        Ok(path.to_string_lossy().into_owned())
    }
}
