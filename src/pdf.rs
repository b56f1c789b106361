use chrono::Local;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind, FontStyle, FontTransform,
};
use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// US Letter in PDF points; one backend pixel is one point.
pub const US_LETTER: (u32, u32) = (612, 792);

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

// Helvetica vertical metrics, as a fraction of the font size.
const ASCENT: f64 = 0.78;
const DESCENT: f64 = 0.22;

// Bezier control distance for a quarter circle.
const KAPPA: f64 = 0.552_284_8;

// Helvetica advance widths for ' '..='~', in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278,
    278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584,
    584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556,
    833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278,
    278, 278, 469, 556, 333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222,
    500, 222, 833, 556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500,
    500, 334, 260, 334, 584,
];

// Helvetica advance widths for the Latin-1 block, WinAnsi 0xA0..=0xFF.
const HELVETICA_LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737,
    333, 400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834,
    834, 611, 667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278,
    278, 278, 278, 722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722,
    722, 667, 667, 611, 556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556,
    556, 278, 278, 278, 278, 556, 556, 556, 556, 556, 556, 556, 584, 611, 556,
    556, 556, 556, 500, 556, 500,
];

/// WinAnsi byte for `c`, if the base-14 fonts can show it.
fn win_ansi_code(c: char) -> Option<u8> {
    match c {
        ' '..='~' | '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
        '\u{20ac}' => Some(0x80),
        '\u{2022}' => Some(0x95),
        '\u{2013}' => Some(0x96),
        '\u{2014}' => Some(0x97),
        '\u{2018}' => Some(0x91),
        '\u{2019}' => Some(0x92),
        '\u{201c}' => Some(0x93),
        '\u{201d}' => Some(0x94),
        _ => None,
    }
}

fn char_width(c: char) -> u16 {
    match win_ansi_code(c) {
        Some(code @ 32..=126) => HELVETICA_WIDTHS[(code - 32) as usize],
        Some(code @ 0xa0..=0xff) => {
            HELVETICA_LATIN1_WIDTHS[(code - 0xa0) as usize]
        }
        Some(0x80) | Some(0x96) => 556,
        Some(0x97) => 1000,
        Some(0x91) | Some(0x92) => 222,
        Some(0x93) | Some(0x94) => 333,
        Some(0x95) => 350,
        _ => HELVETICA_WIDTHS[('?' as u32 - 32) as usize],
    }
}

/// Width of `text` set in Helvetica at `size` points.
pub fn text_width(text: &str, size: f64, bold: bool) -> f64 {
    let em: u32 = text.chars().map(|c| char_width(c) as u32).sum();
    let width = em as f64 * size / 1000.0;
    if bold {
        width * 1.06
    } else {
        width
    }
}

fn fmt(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{:.3}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

// Text is shown through WinAnsiEncoding: printable ASCII goes through as is,
// other WinAnsi characters as octal escapes and the rest as '?'.
fn escape_pdf_string(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match (ch, win_ansi_code(ch)) {
            ('\\', _) => out.push_str("\\\\"),
            ('(', _) => out.push_str("\\("),
            (')', _) => out.push_str("\\)"),
            (' '..='~', _) => out.push(ch),
            (_, Some(code)) => out.push_str(&format!("\\{:03o}", code)),
            (_, None) => out.push('?'),
        }
    }
    out
}

fn rotate(transform: &FontTransform, x: f64, y: f64) -> (f64, f64) {
    match transform {
        FontTransform::None => (x, y),
        FontTransform::Rotate90 => (-y, x),
        FontTransform::Rotate180 => (-x, -y),
        FontTransform::Rotate270 => (y, -x),
    }
}

// Opacity is mapped to an ExtGState resource, quantized to 0..1000.
fn quantize_alpha(alpha: f64) -> u16 {
    ((alpha * 1000.0).round() as i32).clamp(0, 1000) as u16
}

/// Content stream of one page. Coordinates come in with the origin at
/// the top-left corner and are flipped into PDF user space.
pub struct PageCanvas {
    width: u32,
    height: u32,
    content: String,
    opacities: BTreeSet<u16>,
}

impl PageCanvas {
    pub fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            content: String::new(),
            opacities: BTreeSet::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn content(&self) -> &str {
        &self.content
    }

    fn flip(&self, y: f64) -> f64 {
        self.height as f64 - y
    }

    fn begin(&mut self, color: &BackendColor) {
        self.content.push_str("q\n");
        let alpha = quantize_alpha(color.alpha);
        if alpha < 1000 {
            self.opacities.insert(alpha);
            self.content.push_str(&format!("/GS{} gs\n", alpha));
        }
    }

    fn end(&mut self) {
        self.content.push_str("Q\n");
    }

    fn rgb(color: &BackendColor) -> String {
        let (r, g, b) = color.rgb;
        format!(
            "{} {} {}",
            fmt(r as f64 / 255.0),
            fmt(g as f64 / 255.0),
            fmt(b as f64 / 255.0)
        )
    }

    fn push_path(&mut self, points: &[(f64, f64)], close: bool) {
        for (i, (x, y)) in points.iter().enumerate() {
            let op = if i == 0 { "m" } else { "l" };
            let y = self.flip(*y);
            self.content
                .push_str(&format!("{} {} {}\n", fmt(*x), fmt(y), op));
        }
        if close {
            self.content.push_str("h\n");
        }
    }

    pub fn stroke_path(
        &mut self,
        points: &[(f64, f64)],
        color: &BackendColor,
        width: f64,
        close: bool,
    ) {
        if points.len() < 2 || color.alpha <= 0.0 {
            return;
        }
        self.begin(color);
        self.content.push_str(&format!(
            "{} RG\n{} w\n1 J\n1 j\n",
            Self::rgb(color),
            fmt(width.max(0.1))
        ));
        self.push_path(points, close);
        self.content.push_str("S\n");
        self.end();
    }

    pub fn fill_path(&mut self, points: &[(f64, f64)], color: &BackendColor) {
        if points.len() < 3 || color.alpha <= 0.0 {
            return;
        }
        self.begin(color);
        self.content.push_str(&format!("{} rg\n", Self::rgb(color)));
        self.push_path(points, true);
        self.content.push_str("f\n");
        self.end();
    }

    pub fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &BackendColor,
    ) {
        if color.alpha <= 0.0 {
            return;
        }
        self.begin(color);
        let bottom = self.flip(y + height);
        self.content.push_str(&format!(
            "{} rg\n{} {} {} {} re\nf\n",
            Self::rgb(color),
            fmt(x),
            fmt(bottom),
            fmt(width),
            fmt(height)
        ));
        self.end();
    }

    pub fn circle(
        &mut self,
        (cx, cy): (f64, f64),
        radius: f64,
        color: &BackendColor,
        width: f64,
        fill: bool,
    ) {
        if color.alpha <= 0.0 {
            return;
        }
        let k = radius * KAPPA;
        let cy = self.flip(cy);
        self.begin(color);
        if fill {
            self.content.push_str(&format!("{} rg\n", Self::rgb(color)));
        } else {
            self.content.push_str(&format!(
                "{} RG\n{} w\n",
                Self::rgb(color),
                fmt(width)
            ));
        }
        self.content
            .push_str(&format!("{} {} m\n", fmt(cx + radius), fmt(cy)));
        let quarters = [
            (radius, k, k, radius, 0.0, radius),
            (-k, radius, -radius, k, -radius, 0.0),
            (-radius, -k, -k, -radius, 0.0, -radius),
            (k, -radius, radius, -k, radius, 0.0),
        ];
        for (x1, y1, x2, y2, x3, y3) in quarters {
            self.content.push_str(&format!(
                "{} {} {} {} {} {} c\n",
                fmt(cx + x1),
                fmt(cy + y1),
                fmt(cx + x2),
                fmt(cy + y2),
                fmt(cx + x3),
                fmt(cy + y3)
            ));
        }
        self.content.push_str(if fill { "h\nf\n" } else { "h\nS\n" });
        self.end();
    }

    /// Sets `text` with its baseline origin at the given top-left based
    /// point; `axis` and `up` are the text directions in that space.
    pub fn text(
        &mut self,
        text: &str,
        origin: (f64, f64),
        axis: (f64, f64),
        up: (f64, f64),
        size: f64,
        bold: bool,
        color: &BackendColor,
    ) {
        if color.alpha <= 0.0 {
            return;
        }
        let font = if bold { BOLD_FONT } else { REGULAR_FONT };
        let y = self.flip(origin.1);
        self.begin(color);
        self.content.push_str(&format!(
            "{} rg\nBT\n/{} {} Tf\n{} {} {} {} {} {} Tm\n({}) Tj\nET\n",
            Self::rgb(color),
            font,
            fmt(size),
            fmt(axis.0),
            fmt(-axis.1),
            fmt(up.0),
            fmt(-up.1),
            fmt(origin.0),
            fmt(y),
            escape_pdf_string(text)
        ));
        self.end();
    }
}

/// plotters backend that draws into a [`PageCanvas`].
pub struct PdfBackend<'a> {
    canvas: &'a mut PageCanvas,
}

impl<'a> PdfBackend<'a> {
    pub fn new(canvas: &'a mut PageCanvas) -> Self {
        Self { canvas }
    }
}

fn to_points<I: IntoIterator<Item = BackendCoord>>(path: I) -> Vec<(f64, f64)> {
    path.into_iter().map(|(x, y)| (x as f64, y as f64)).collect()
}

impl<'a> DrawingBackend for PdfBackend<'a> {
    type ErrorType = Infallible;

    fn get_size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Infallible>> {
        Ok(())
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.canvas
            .fill_rect(point.0 as f64, point.1 as f64, 1.0, 1.0, &color);
        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.canvas.stroke_path(
            &to_points([from, to]),
            &style.color(),
            style.stroke_width() as f64,
            false,
        );
        Ok(())
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let (x0, y0) = (upper_left.0 as f64, upper_left.1 as f64);
        let (x1, y1) = (bottom_right.0 as f64, bottom_right.1 as f64);
        if fill {
            self.canvas
                .fill_rect(x0, y0, x1 - x0, y1 - y0, &style.color());
        } else {
            self.canvas.stroke_path(
                &[(x0, y0), (x1, y0), (x1, y1), (x0, y1)],
                &style.color(),
                style.stroke_width() as f64,
                true,
            );
        }
        Ok(())
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.canvas.stroke_path(
            &to_points(path),
            &style.color(),
            style.stroke_width() as f64,
            false,
        );
        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.canvas.circle(
            (center.0 as f64, center.1 as f64),
            radius as f64,
            &style.color(),
            style.stroke_width() as f64,
            fill,
        );
        Ok(())
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        self.canvas.fill_path(&to_points(vert), &style.color());
        Ok(())
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Infallible>> {
        let size = style.size();
        if text.is_empty() || size <= 0.0 {
            return Ok(());
        }
        let bold = matches!(style.style(), FontStyle::Bold);
        let width = text_width(text, size, bold);
        let anchor = style.anchor();
        let dx = match anchor.h_pos {
            HPos::Left => 0.0,
            HPos::Center => -width / 2.0,
            HPos::Right => -width,
        };
        let dy = match anchor.v_pos {
            VPos::Top => ASCENT * size,
            VPos::Center => (ASCENT - 0.5) * size,
            VPos::Bottom => -DESCENT * size,
        };
        let transform = style.transform();
        let (ox, oy) = rotate(&transform, dx, dy);
        let origin = (pos.0 as f64 + ox, pos.1 as f64 + oy);
        let axis = rotate(&transform, 1.0, 0.0);
        let up = rotate(&transform, 0.0, -1.0);
        self.canvas
            .text(text, origin, axis, up, size, bold, &style.color());
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Infallible>> {
        let bold = matches!(style.style(), FontStyle::Bold);
        let width = text_width(text, style.size(), bold);
        Ok((width.ceil() as u32, style.size().ceil() as u32))
    }
}

/// A PDF document assembled one page at a time. Nothing touches the
/// destination until [`PdfDocument::save`], which replaces it atomically.
pub struct PdfDocument {
    doc: Document,
    pages_id: ObjectId,
    fonts: (ObjectId, ObjectId),
    opacity_states: HashMap<u16, ObjectId>,
    page_ids: Vec<ObjectId>,
    page_size: (u32, u32),
    title: String,
}

impl PdfDocument {
    pub fn new(page_size: (u32, u32), title: &str) -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        Self {
            doc,
            pages_id,
            fonts: (regular_id, bold_id),
            opacity_states: HashMap::new(),
            page_ids: vec![],
            page_size,
            title: title.to_string(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn opacity_state(&mut self, key: u16) -> ObjectId {
        if let Some(id) = self.opacity_states.get(&key) {
            return *id;
        }
        let alpha = key as f32 / 1000.0;
        let id = self.doc.add_object(dictionary! {
            "Type" => "ExtGState",
            "ca" => Object::Real(alpha),
            "CA" => Object::Real(alpha),
        });
        self.opacity_states.insert(key, id);
        id
    }

    pub fn add_page(&mut self, canvas: PageCanvas) {
        let mut ext_states = Dictionary::new();
        for key in canvas.opacities.iter() {
            let id = self.opacity_state(*key);
            ext_states.set(format!("GS{}", key), id);
        }
        let (width, height) = canvas.size();
        let content_id = self.doc.add_object(Stream::new(
            dictionary! {},
            canvas.content.into_bytes(),
        ));
        let resources = dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => self.fonts.0,
                BOLD_FONT => self.fonts.1,
            },
            "ExtGState" => ext_states,
        };
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => resources,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width as i64),
                Object::Integer(height as i64),
            ],
        });
        self.page_ids.push(page_id);
    }

    fn finalize(&mut self) {
        let kids: Vec<Object> =
            self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let (width, height) = self.page_size;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(self.page_ids.len() as i64),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width as i64),
                Object::Integer(height as i64),
            ],
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let created = format!("D:{}", Local::now().format("%Y%m%d%H%M%S"));
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.title.as_str()),
            "Producer" => Object::string_literal(concat!(
                "culvert-report ",
                env!("CARGO_PKG_VERSION")
            )),
            "CreationDate" => Object::string_literal(created),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);
        self.doc.compress();
    }

    /// Writes the document next to `path` and moves it into place once
    /// complete, so a failure never leaves a truncated file behind.
    pub fn save(mut self, path: &Path) -> io::Result<()> {
        self.finalize();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        self.doc
            .save_to(&mut file)
            .map_err(|e| io::Error::other(e.to_string()))?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;

    #[test]
    fn test_fmt_trims_zeros() {
        assert_eq!(fmt(1.5), "1.5");
        assert_eq!(fmt(2.0), "2");
        assert_eq!(fmt(-0.0001), "0");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn test_escape_pdf_string() {
        assert_eq!(escape_pdf_string("Q (cfs)"), "Q \\(cfs\\)");
        assert_eq!(escape_pdf_string("a\\b"), "a\\\\b");
        assert_eq!(escape_pdf_string("5°"), "5\\260");
        assert_eq!(escape_pdf_string("Café"), "Caf\\351");
        assert_eq!(escape_pdf_string("10 – 20 €"), "10 \\226 20 \\200");
        assert_eq!(escape_pdf_string("水"), "?");
    }

    #[test]
    fn test_text_width_covers_latin1() {
        assert!((text_width("é", 10.0, false) - 5.56).abs() < 1e-9);
        assert!((text_width("Æ", 1.0, false) - 1.0).abs() < 1e-9);
        assert!((text_width("—", 1.0, false) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_width_uses_helvetica_metrics() {
        assert!((text_width("0", 10.0, false) - 5.56).abs() < 1e-9);
        assert!((text_width("Wi", 1000.0, false) - 1166.0).abs() < 1e-9);
        assert!(text_width("Peak", 8.0, true) > text_width("Peak", 8.0, false));
    }

    #[test]
    fn test_backend_flips_line_coordinates() {
        let mut canvas = PageCanvas::new((100, 200));
        {
            let root = PdfBackend::new(&mut canvas).into_drawing_area();
            root.draw(&PathElement::new(vec![(10, 20), (30, 40)], &BLUE))
                .unwrap();
            root.present().unwrap();
        }
        let content = canvas.content();
        assert!(content.contains("10 180 m\n"));
        assert!(content.contains("30 160 l\n"));
        assert!(content.contains("0 0 1 RG\n"));
        assert!(content.contains("S\n"));
    }

    #[test]
    fn test_backend_registers_opacity_state() {
        let mut canvas = PageCanvas::new((100, 100));
        {
            let root = PdfBackend::new(&mut canvas).into_drawing_area();
            root.draw(&Rectangle::new([(10, 10), (20, 20)], WHITE.mix(0.8).filled()))
                .unwrap();
        }
        assert!(canvas.content().contains("/GS800 gs\n"));
        assert!(canvas.opacities.contains(&800));
    }

    #[test]
    fn test_backend_sets_text() {
        let mut canvas = PageCanvas::new((100, 100));
        {
            let root = PdfBackend::new(&mut canvas).into_drawing_area();
            let style = TextStyle::from(FontDesc::new(
                FontFamily::SansSerif,
                10.0,
                FontStyle::Normal,
            ))
            .color(&BLACK);
            root.draw_text("Peak Q", &style, (5, 5)).unwrap();
        }
        let content = canvas.content();
        assert!(content.contains("/F1 10 Tf\n"));
        assert!(content.contains("(Peak Q) Tj\n"));
    }

    #[test]
    fn test_blank_canvas() {
        let canvas = PageCanvas::new(US_LETTER);
        assert!(canvas.content().is_empty());
        assert_eq!(canvas.size(), (612, 792));
    }

    #[test]
    fn test_document_saves_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.pdf");
        let mut document = PdfDocument::new(US_LETTER, "test");
        for _ in 0..2 {
            let mut canvas = PageCanvas::new(US_LETTER);
            canvas.fill_rect(
                0.0,
                0.0,
                10.0,
                10.0,
                &BackendColor {
                    alpha: 0.5,
                    rgb: (255, 0, 0),
                },
            );
            document.add_page(canvas);
        }
        assert_eq!(document.page_count(), 2);
        document.save(&path).unwrap();

        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn test_document_without_pages_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        PdfDocument::new(US_LETTER, "empty").save(&path).unwrap();
        let loaded = Document::load(&path).unwrap();
        assert_eq!(loaded.get_pages().len(), 0);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"stale").unwrap();
        let mut document = PdfDocument::new(US_LETTER, "fresh");
        document.add_page(PageCanvas::new(US_LETTER));
        document.save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
    }
}
