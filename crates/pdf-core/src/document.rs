//! Template-backed PDF editing
//!
//! [`PdfDocument`] wraps a parsed [`lopdf::Document`]. Drawing calls buffer
//! content operators per page; `save`/`to_bytes` flush those buffers onto
//! the existing page content, embed every font that was drawn with, and
//! write the result.

use crate::text::{
    encode_text_literal, generate_line_operators, generate_text_operators, TextRenderContext,
};
use crate::{Align, BuiltinFont, FontData, PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::path::Path;

/// Attribute inheritance walks stop after this many Parent hops
const MAX_INHERITANCE_DEPTH: usize = 10;

/// A font registered for drawing
enum RegisteredFont {
    /// Standard font referenced by name, no font program embedded
    Builtin(BuiltinFont),
    /// TrueType font embedded as Type0/CIDFontType2
    Embedded(FontData),
}

impl RegisteredFont {
    fn text_width_points(&self, text: &str, font_size: f32) -> f64 {
        match self {
            RegisteredFont::Builtin(builtin) => builtin.text_width(text, font_size) as f64,
            RegisteredFont::Embedded(font_data) => {
                font_data.text_width_points(text, font_size) as f64
            }
        }
    }
}

/// An opened PDF with overlay drawing operations
///
/// All coordinates are PDF user space: origin at the bottom-left corner of
/// the page, y growing upward, units in points.
pub struct PdfDocument {
    inner: Document,
    /// Fonts available to `set_font`, keyed by registration name
    fonts: HashMap<String, RegisteredFont>,
    current_font: Option<String>,
    current_font_size: f32,
    /// Object ids of fonts written into the PDF, filled during save
    embedded_fonts: HashMap<String, ObjectId>,
    /// page number -> font name -> resource name ("F1", "F2", ...)
    page_font_resources: HashMap<usize, HashMap<String, String>>,
    next_font_resource: u32,
    /// Operators waiting to be flushed onto each page at save time
    page_content_buffer: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    fn from_inner(inner: Document) -> Self {
        Self {
            inner,
            fonts: HashMap::new(),
            current_font: None,
            current_font_size: 12.0,
            embedded_fonts: HashMap::new(),
            page_font_resources: HashMap::new(),
            next_font_resource: 1,
            page_content_buffer: HashMap::new(),
        }
    }

    /// Open a PDF from a file path
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::open("template.pdf")?;
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let inner = Document::load(path).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_inner(inner))
    }

    /// Open a PDF from in-memory bytes
    pub fn open_from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::OpenError(e.to_string()))?;
        Ok(Self::from_inner(inner))
    }

    /// Number of pages in the document
    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Register a TrueType font from raw bytes
    ///
    /// # Arguments
    /// * `name` - Registration name, later passed to `set_font`
    /// * `ttf_data` - TrueType font file bytes
    pub fn add_font(&mut self, name: &str, ttf_data: &[u8]) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }

        let font_data = FontData::from_ttf(name, ttf_data)?;
        self.fonts
            .insert(name.to_string(), RegisteredFont::Embedded(font_data));

        Ok(())
    }

    /// Register an already parsed TrueType font under `font.name`
    ///
    /// Avoids re-parsing when the same font is drawn into many documents.
    pub fn add_font_data(&mut self, font: FontData) -> Result<()> {
        if self.fonts.contains_key(&font.name) {
            return Err(PdfError::FontAlreadyExists(font.name));
        }

        self.fonts
            .insert(font.name.clone(), RegisteredFont::Embedded(font));

        Ok(())
    }

    /// Register a built-in standard font under its PostScript name
    ///
    /// Registering the same built-in twice is a no-op.
    pub fn add_builtin_font(&mut self, font: BuiltinFont) {
        self.fonts
            .entry(font.postscript_name().to_string())
            .or_insert(RegisteredFont::Builtin(font));
    }

    /// Whether a font is registered under the given name
    pub fn has_font(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Select the font and size used by subsequent `insert_text` calls
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }

        self.current_font = Some(name.to_string());
        self.current_font_size = size;

        Ok(())
    }

    /// Measure text in points with the current font and size
    pub fn get_text_width(&self, text: &str) -> Result<f64> {
        let font_name = self
            .current_font
            .as_ref()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;
        let font = self
            .fonts
            .get(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;

        Ok(font.text_width_points(text, self.current_font_size))
    }

    /// Draw text on a page with the current font
    ///
    /// # Arguments
    /// * `text` - Text to draw; empty text is a no-op
    /// * `page` - Page number (1-indexed)
    /// * `x`, `y` - Position in points from the bottom-left of the page
    /// * `align` - Placement of the text run relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        if text.is_empty() {
            return Ok(());
        }

        let font_name = self
            .current_font
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("No font set".to_string()))?;

        // Encode the text payload and measure it. Embedded fonts also track
        // used characters for the widths array and ToUnicode CMap.
        let (payload, text_width) = match self.fonts.get_mut(&font_name) {
            Some(RegisteredFont::Builtin(builtin)) => (
                encode_text_literal(text),
                builtin.text_width(text, self.current_font_size) as f64,
            ),
            Some(RegisteredFont::Embedded(font_data)) => {
                font_data.add_chars(text);
                (
                    font_data.encode_text_hex(text),
                    font_data.text_width_points(text, self.current_font_size) as f64,
                )
            }
            None => return Err(PdfError::FontNotFound(font_name)),
        };

        let font_resource_name = self.page_font_resource_name(&font_name, page);

        let ctx = TextRenderContext {
            font_name: font_resource_name,
            font_size: self.current_font_size,
            text_width,
        };

        let operators = generate_text_operators(&payload, x, y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Stroke a straight line between two points
    ///
    /// Coordinates are in points from the bottom-left of the page.
    pub fn draw_line(&mut self, page: usize, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        let operators = generate_line_operators(x1, y1, x2, y2);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Restructure the document to contain only its first page
    ///
    /// The root Pages tree is rewritten to reference the first page alone and
    /// the page's Parent is repointed at the root node. Inherited MediaBox and
    /// Resources are copied onto the page first, since its previous parent
    /// chain (and anything held on an intermediate Pages node) may no longer
    /// be reachable afterwards.
    pub fn keep_first_page(&mut self) -> Result<()> {
        let pages = self.inner.get_pages();
        let page_count = pages.len();
        let first_page_id = *pages.get(&1).ok_or(PdfError::InvalidPage(1, page_count))?;

        if page_count == 1 {
            return Ok(());
        }

        let media_box = self.get_inherited_media_box(first_page_id)?;
        let resources = self.get_inherited_resources(first_page_id)?;
        if let Ok(Object::Dictionary(page_dict)) = self.inner.get_object_mut(first_page_id) {
            if !page_dict.has(b"MediaBox") {
                page_dict.set("MediaBox", Object::Array(media_box));
            }
            if !page_dict.has(b"Resources") && !resources.is_empty() {
                page_dict.set("Resources", Object::Dictionary(resources));
            }
        }

        let pages_id = self.root_pages_id()?;
        if let Ok(Object::Dictionary(pages_dict)) = self.inner.get_object_mut(pages_id) {
            pages_dict.set("Kids", Object::Array(vec![Object::Reference(first_page_id)]));
            pages_dict.set("Count", Object::Integer(1));
        }

        if let Ok(Object::Dictionary(page_dict)) = self.inner.get_object_mut(first_page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }

        Ok(())
    }

    /// Write the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.flush_content_buffers()?;
        self.embed_fonts()?;

        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Serialize the document into a byte buffer
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;
        self.embed_fonts()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;

        Ok(buffer)
    }

    /// Page size (width, height) in points
    ///
    /// Follows the MediaBox/CropBox inheritance chain; falls back to US
    /// letter when no box is found.
    pub fn page_size(&self, page: usize) -> Result<(f64, f64)> {
        let page_id = self.page_object_id(page)?;
        let media_box = self.get_inherited_media_box(page_id)?;

        let x1 = Self::media_box_value(&media_box, 0)?;
        let y1 = Self::media_box_value(&media_box, 1)?;
        let x2 = Self::media_box_value(&media_box, 2)?;
        let y2 = Self::media_box_value(&media_box, 3)?;

        Ok((x2 - x1, y2 - y1))
    }

    /// Reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    /// Mutable reference to the underlying lopdf document
    pub fn inner_mut(&mut self) -> &mut Document {
        &mut self.inner
    }

    /// Object id for a 1-indexed page number
    fn page_object_id(&self, page: usize) -> Result<ObjectId> {
        let pages = self.inner.get_pages();
        pages
            .get(&(page as u32))
            .copied()
            .ok_or(PdfError::InvalidPage(page, pages.len()))
    }

    /// Root Pages node id from the document catalog
    fn root_pages_id(&self) -> Result<ObjectId> {
        let root = self
            .inner
            .trailer
            .get(b"Root")
            .map_err(|_| PdfError::ParseError("Document trailer missing Root entry".to_string()))?;
        let catalog_id = root
            .as_reference()
            .map_err(|_| PdfError::ParseError("Root is not a reference".to_string()))?;
        let catalog_obj = self.inner.get_object(catalog_id)?;
        let catalog_dict = catalog_obj
            .as_dict()
            .map_err(|_| PdfError::ParseError("Catalog is not a dictionary".to_string()))?;
        let pages_ref = catalog_dict
            .get(b"Pages")
            .map_err(|_| PdfError::ParseError("Catalog missing Pages entry".to_string()))?;
        pages_ref
            .as_reference()
            .map_err(|_| PdfError::ParseError("Pages is not a reference".to_string()))
    }

    /// Resource name ("F1", "F2", ...) for a font on a page
    ///
    /// Assigned on first use per page; the font object itself is written
    /// into the PDF at save time.
    fn page_font_resource_name(&mut self, font_name: &str, page: usize) -> String {
        let page_resources = self.page_font_resources.entry(page).or_default();

        if let Some(resource_name) = page_resources.get(font_name) {
            return resource_name.clone();
        }

        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;

        page_resources.insert(font_name.to_string(), resource_name.clone());

        resource_name
    }

    /// Write every font that was drawn with into the PDF
    fn embed_fonts(&mut self) -> Result<()> {
        // Re-embed from scratch so repeated saves stay consistent
        self.embedded_fonts.clear();

        // Only fonts that were actually drawn with have page resources
        let mut font_names: Vec<String> = self
            .page_font_resources
            .values()
            .flat_map(|fonts| fonts.keys().cloned())
            .collect();
        font_names.sort();
        font_names.dedup();

        for font_name in font_names {
            self.embed_font_object(&font_name)?;
        }

        self.finalize_page_font_resources()
    }

    /// Add one font's PDF objects and record its id
    ///
    /// Built-ins are a single dictionary. Embedded fonts produce the full
    /// Type0 chain; the cross-references between its objects are wired here
    /// as each one receives an id.
    fn embed_font_object(&mut self, font_name: &str) -> Result<ObjectId> {
        let font = self
            .fonts
            .get(font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.to_string()))?;

        let font_id = match font {
            RegisteredFont::Builtin(builtin) => {
                let font_dict = builtin.font_dictionary();
                self.inner.add_object(font_dict)
            }
            RegisteredFont::Embedded(font_data) => {
                let objects = font_data.to_pdf_objects()?;

                let font_file_id = self.inner.add_object(objects.font_file_stream);
                let tounicode_id = self.inner.add_object(objects.tounicode_stream);

                let mut descriptor = objects.font_descriptor;
                descriptor.set("FontFile2", Object::Reference(font_file_id));
                let descriptor_id = self.inner.add_object(descriptor);

                let mut cid_font = objects.cid_font;
                cid_font.set("FontDescriptor", Object::Reference(descriptor_id));
                let cid_font_id = self.inner.add_object(cid_font);

                let mut type0 = objects.type0_font;
                type0.set(
                    "DescendantFonts",
                    Object::Array(vec![Object::Reference(cid_font_id)]),
                );
                type0.set("ToUnicode", Object::Reference(tounicode_id));
                self.inner.add_object(type0)
            }
        };

        self.embedded_fonts.insert(font_name.to_string(), font_id);

        Ok(font_id)
    }

    /// Write font references into the Resources of every page that drew text
    fn finalize_page_font_resources(&mut self) -> Result<()> {
        let per_page: Vec<(usize, Vec<(String, String)>)> = self
            .page_font_resources
            .iter()
            .map(|(&page, fonts)| (page, fonts.clone().into_iter().collect()))
            .collect();

        for (page, fonts) in per_page {
            if !fonts.is_empty() {
                self.write_page_font_resources(page, &fonts)?;
            }
        }

        Ok(())
    }

    /// Merge font references into a page's Resources dictionary
    ///
    /// The page's effective Resources (own or inherited) are copied onto
    /// the page itself with the Font entries merged in, so resources the
    /// template already uses stay reachable.
    fn write_page_font_resources(
        &mut self,
        page: usize,
        fonts: &[(String, String)],
    ) -> Result<()> {
        let page_id = self.page_object_id(page)?;
        let mut resources = self.get_inherited_resources(page_id)?;

        let mut font_dict = match resources.get(b"Font") {
            Ok(existing) => {
                let resolved = match existing {
                    Object::Reference(id) => self.inner.get_object(*id)?,
                    direct => direct,
                };
                resolved
                    .as_dict()
                    .map(|d| d.clone())
                    .unwrap_or_else(|_| Dictionary::new())
            }
            Err(_) => Dictionary::new(),
        };

        for (font_name, resource_name) in fonts {
            let font_ref = self
                .embedded_fonts
                .get(font_name)
                .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
            font_dict.set(resource_name.as_bytes(), Object::Reference(*font_ref));
        }

        resources.set("Font", Object::Dictionary(font_dict));

        if let Ok(Object::Dictionary(page_dict)) = self.inner.get_object_mut(page_id) {
            page_dict.set("Resources", Object::Dictionary(resources));
        }

        Ok(())
    }

    /// Effective MediaBox for a page, following the inheritance chain
    ///
    /// Pages commonly inherit the box from an ancestor Pages node. CropBox
    /// is accepted in place of MediaBox; a missing box falls back to US
    /// letter.
    fn get_inherited_media_box(&self, page_id: ObjectId) -> Result<Vec<Object>> {
        let mut current_id = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
                let resolved = match media_box {
                    Object::Reference(id) => self.inner.get_object(*id)?,
                    direct => direct,
                };
                return resolved
                    .as_array()
                    .map(|arr| arr.clone())
                    .map_err(|_| PdfError::ParseError("MediaBox is not an array".to_string()));
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(vec![0.into(), 0.into(), 612.0.into(), 792.0.into()])
    }

    /// Effective Resources for a page, following the inheritance chain
    ///
    /// Returns an owned copy; an empty dictionary when no node declares one.
    fn get_inherited_resources(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut current_id = page_id;

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let dict = self
                .inner
                .get_object(current_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Object is not a dictionary".to_string()))?;

            if let Ok(resources) = dict.get(b"Resources") {
                let resolved = match resources {
                    Object::Reference(id) => self.inner.get_object(*id)?,
                    direct => direct,
                };
                return resolved
                    .as_dict()
                    .map(|d| d.clone())
                    .map_err(|_| {
                        PdfError::ParseError("Resources is not a dictionary".to_string())
                    });
            }

            match dict.get(b"Parent") {
                Ok(Object::Reference(parent_id)) => current_id = *parent_id,
                _ => break,
            }
        }

        Ok(Dictionary::new())
    }

    /// Read one MediaBox entry as a number
    fn media_box_value(media_box: &[Object], index: usize) -> Result<f64> {
        let value = media_box
            .get(index)
            .ok_or_else(|| PdfError::ParseError(format!("Invalid MediaBox entry {index}")))?;

        match value {
            Object::Integer(v) => Ok(*v as f64),
            Object::Real(v) => Ok(*v as f64),
            _ => Err(PdfError::ParseError(format!(
                "Invalid MediaBox entry {index}"
            ))),
        }
    }

    /// Queue content operators for a page
    ///
    /// Buffered so each page gets exactly one appended stream per save, no
    /// matter how many drawing calls were made.
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.page_content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Flush queued operators onto their pages
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content_buffer.drain().collect();

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }

        Ok(())
    }

    /// Append operators after a page's existing content
    ///
    /// The existing content is gathered (decompressed, concatenated if split
    /// over several streams) and wrapped in q/Q, so the appended operators
    /// start from the default graphics state. The page then points at one
    /// fresh uncompressed stream.
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self.page_object_id(page)?;

        let (existing, mut page_dict) = {
            let dict = self
                .inner
                .get_object(page_id)?
                .as_dict()
                .map_err(|_| PdfError::ParseError("Page object is not a dictionary".to_string()))?;
            (self.gather_page_content(dict), dict.clone())
        };

        let mut combined = Vec::with_capacity(existing.len() + content.len() + 6);
        combined.extend_from_slice(b"q\n");
        combined.extend_from_slice(&existing);
        combined.extend_from_slice(b"\nQ\n");
        combined.extend_from_slice(content);

        let stream_id = self
            .inner
            .add_object(Stream::new(Dictionary::new(), combined));
        page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, page_dict.into());

        Ok(())
    }

    /// Current content bytes of a page, decompressed and concatenated
    fn gather_page_content(&self, page_dict: &Dictionary) -> Vec<u8> {
        match page_dict.get(b"Contents") {
            Ok(Object::Array(parts)) => parts
                .iter()
                .filter_map(|part| self.content_stream_data(part))
                .flatten()
                .collect(),
            Ok(single) => self.content_stream_data(single).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Bytes of one content stream, following a reference if needed
    fn content_stream_data(&self, obj: &Object) -> Option<Vec<u8>> {
        let stream = match obj {
            Object::Stream(stream) => stream,
            Object::Reference(id) => match self.inner.get_object(*id) {
                Ok(Object::Stream(stream)) => stream,
                _ => return None,
            },
            _ => return None,
        };

        Some(
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
        )
    }
}
