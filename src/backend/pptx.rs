//! PresentationML (.pptx) backend.

use super::ooxml::{escape, relationships, Package, NS_RELATIONSHIPS, XML_HEADER};
use super::{Backend, BackendKind, PowerPointBackend};
use crate::error::Result;
use crate::model::{PresentationContent, Rect, Slide, SlideLayout};

const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_MASTER: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_LAYOUT: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";

const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

/// EMUs per inch.
const EMU_PER_INCH: f64 = 914_400.0;
/// 4:3 slide, 10in x 7.5in.
const SLIDE_WIDTH: u64 = 9_144_000;
const SLIDE_HEIGHT: u64 = 6_858_000;

const TITLE_SIZE: u32 = 40;
const BODY_SIZE: u32 = 24;

/// Writes presentations as PresentationML packages.
#[derive(Debug, Clone, Default)]
pub struct PptxBackend {
    _private: (),
}

impl PptxBackend {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Backend for PptxBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Real
    }

    fn name(&self) -> &str {
        "pptx"
    }
}

impl PowerPointBackend for PptxBackend {
    fn render_presentation(&self, content: &PresentationContent) -> Result<Vec<u8>> {
        let slide_count = content.slide_count();

        let mut overrides = vec![
            ("/ppt/presentation.xml".to_string(), CT_PRESENTATION),
            ("/ppt/slideMasters/slideMaster1.xml".to_string(), CT_MASTER),
            ("/ppt/slideLayouts/slideLayout1.xml".to_string(), CT_LAYOUT),
            ("/ppt/theme/theme1.xml".to_string(), CT_THEME),
        ];
        for i in 1..=slide_count {
            overrides.push((format!("/ppt/slides/slide{}.xml", i), CT_SLIDE));
        }

        let mut package = Package::new();
        package.add_boilerplate(&overrides, "ppt/presentation.xml")?;
        package.add("ppt/presentation.xml", &presentation_xml(slide_count))?;
        package.add(
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels(slide_count),
        )?;
        package.add("ppt/slideMasters/slideMaster1.xml", &master_xml())?;
        package.add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                (
                    "rId1".to_string(),
                    REL_SLIDE_LAYOUT,
                    "../slideLayouts/slideLayout1.xml".to_string(),
                ),
                ("rId2".to_string(), REL_THEME, "../theme/theme1.xml".to_string()),
            ]),
        )?;
        package.add("ppt/slideLayouts/slideLayout1.xml", &layout_xml())?;
        package.add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[(
                "rId1".to_string(),
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml".to_string(),
            )]),
        )?;
        package.add("ppt/theme/theme1.xml", THEME_XML)?;

        let slide_rels = relationships(&[(
            "rId1".to_string(),
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml".to_string(),
        )]);
        for (i, slide) in content.slides.iter().enumerate() {
            package.add(&format!("ppt/slides/slide{}.xml", i + 1), &slide_xml(slide))?;
            package.add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
                &slide_rels,
            )?;
        }

        log::debug!("pptx: rendered {} slides", slide_count);
        package.finish()
    }
}

fn root_open(tag: &str, attrs: &str) -> String {
    format!(
        r#"<{} xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"{}>"#,
        tag, NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, attrs
    )
}

/// Slide ids start at 256; rId1 is the master and rId2 the theme.
fn presentation_xml(slide_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(XML_HEADER);
    xml.push_str(&root_open("p:presentation", ""));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..slide_count {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + i,
                i + 3
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/><p:notesSz cx="{}" cy="{}"/>"#,
        SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
    ));
    xml.push_str("</p:presentation>");
    xml
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = vec![
        (
            "rId1".to_string(),
            REL_SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        ("rId2".to_string(), REL_THEME, "theme/theme1.xml".to_string()),
    ];
    for i in 0..slide_count {
        rels.push((
            format!("rId{}", i + 3),
            REL_SLIDE,
            format!("slides/slide{}.xml", i + 1),
        ));
    }
    relationships(&rels)
}

const EMPTY_TREE: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

fn master_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_HEADER);
    xml.push_str(&root_open("p:sldMaster", ""));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(EMPTY_TREE);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str(r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#);
    xml.push_str("</p:sldMaster>");
    xml
}

fn layout_xml() -> String {
    let mut xml = String::new();
    xml.push_str(XML_HEADER);
    xml.push_str(&root_open("p:sldLayout", r#" type="blank" preserve="1""#));
    xml.push_str(r#"<p:cSld name="Blank"><p:spTree>"#);
    xml.push_str(EMPTY_TREE);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

/// Title and body areas of a layout, in inches.
fn layout_areas(layout: SlideLayout) -> (Rect, Rect) {
    match layout {
        SlideLayout::Title => (
            Rect::new(0.75, 2.33, 8.5, 1.6),
            Rect::new(1.5, 4.25, 7.0, 1.75),
        ),
        SlideLayout::SectionHeader => (
            Rect::new(0.75, 2.5, 8.5, 1.5),
            Rect::new(0.75, 4.1, 8.5, 1.0),
        ),
        _ => (
            Rect::new(0.5, 0.3, 9.0, 1.25),
            Rect::new(0.5, 1.75, 9.0, 5.0),
        ),
    }
}

fn slide_xml(slide: &Slide) -> String {
    let (title_area, body_area) = layout_areas(slide.layout);
    let mut shapes = Vec::new();

    if let Some(title) = &slide.title {
        shapes.push(("Title", title_area, vec![title.as_str()], Some(TITLE_SIZE)));
    }
    if !slide.body.is_empty() {
        let lines = slide.body.iter().flat_map(|entry| entry.lines()).collect();
        shapes.push(("Content", body_area, lines, Some(BODY_SIZE)));
    }
    for text_box in &slide.text_boxes {
        shapes.push((
            "TextBox",
            text_box.position,
            text_box.text.lines().collect(),
            text_box.font_size,
        ));
    }

    let mut xml = String::new();
    xml.push_str(XML_HEADER);
    xml.push_str(&root_open("p:sld", ""));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(EMPTY_TREE);
    for (i, (name, area, lines, size)) in shapes.iter().enumerate() {
        // id 1 is the group shape
        xml.push_str(&shape_xml(i + 2, name, *area, lines, *size));
    }
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn shape_xml(id: usize, name: &str, area: Rect, lines: &[&str], size: Option<u32>) -> String {
    let size_attr = size
        .map(|pt| format!(r#" sz="{}""#, pt * 100))
        .unwrap_or_default();

    let mut xml = String::new();
    xml.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{} {}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
        id,
        name,
        id - 1
    ));
    xml.push_str(&format!(
        r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#,
        emu(area.left),
        emu(area.top),
        emu(area.width),
        emu(area.height)
    ));
    xml.push_str(r#"<p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>"#);
    if lines.is_empty() {
        xml.push_str(r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#);
    }
    for line in lines {
        xml.push_str(&format!(
            r#"<a:p><a:r><a:rPr lang="en-US"{} dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            size_attr,
            escape(line)
        ));
    }
    xml.push_str("</p:txBody></p:sp>");
    xml
}

fn emu(inches: f64) -> u64 {
    (inches * EMU_PER_INCH).round().max(0.0) as u64
}

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">"#,
    r#"<a:themeElements>"#,
    r#"<a:clrScheme name="Office">"#,
    r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
    r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="1F497D"/></a:dk2>"#,
    r#"<a:lt2><a:srgbClr val="EEECE1"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="4F81BD"/></a:accent1>"#,
    r#"<a:accent2><a:srgbClr val="C0504D"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="9BBB59"/></a:accent3>"#,
    r#"<a:accent4><a:srgbClr val="8064A2"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="4BACC6"/></a:accent5>"#,
    r#"<a:accent6><a:srgbClr val="F79646"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink>"#,
    r#"<a:folHlink><a:srgbClr val="800080"/></a:folHlink>"#,
    r#"</a:clrScheme>"#,
    r#"<a:fontScheme name="Office">"#,
    r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme>"#,
    r#"<a:fmtScheme name="Office">"#,
    r#"<a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:fillStyleLst>"#,
    r#"<a:lnStyleLst>"#,
    r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst>"#,
    r#"<a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst>"#,
    r#"<a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:bgFillStyleLst>"#,
    r#"</a:fmtScheme>"#,
    r#"</a:themeElements>"#,
    r#"<a:objectDefaults/><a:extraClrSchemeLst/>"#,
    r#"</a:theme>"#
);
