use crate::error::Result;
use crate::facts::Facts;
use crate::handle::FileHandle;
use serde_json::{Map, Value};

/// Every exiftool tag except the input echo and exiftool's own bookkeeping.
pub(super) fn exiftool(handle: &FileHandle) -> Result<Facts> {
    let exif = handle.exif()?;
    Ok(exif
        .iter()
        .filter(|(key, _)| *key != "SourceFile" && !key.starts_with("ExifTool:"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect())
}

pub(super) fn softwares(handle: &FileHandle) -> Result<Facts> {
    let exif = handle.exif()?;
    let found = detect_softwares(&exif);
    let mut facts = Facts::new();
    match found.len() {
        0 => {},
        1 => facts.insert("Composite:Softwares", found[0]),
        _ => facts.insert("Composite:Softwares", found),
    }
    Ok(facts)
}

fn tag<'a>(exif: &'a Map<String, Value>, key: &str) -> &'a str {
    exif.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn detect_softwares(exif: &Map<String, Value>) -> Vec<&'static str> {
    let mut found = Vec::new();
    if tag(exif, "SVG:Output_extension") == "org.inkscape.output.svg.inkscape" {
        found.push("Inkscape");
    }
    for key in ["PNG:Software", "EXIF:Software"] {
        let software = tag(exif, key).to_lowercase();
        let name = match software.as_str() {
            s if s.starts_with("matlab") => "MATLAB",
            s if s.starts_with("imagemagick") => "ImageMagick",
            s if s.starts_with("adobe imageready") => "Adobe ImageReady",
            s if s.starts_with("adobe photoshop elements") => "Adobe Photoshop Elements",
            s if s.starts_with("adobe photoshop express") => "Adobe Photoshop Express",
            s if s.starts_with("adobe photoshop") => "Adobe Photoshop",
            s if s.starts_with("picasa") => "Picasa",
            s if s.starts_with("gimp") => "GIMP",
            s if s.starts_with("microsoft ice ") => "Microsoft ICE",
            _ => continue,
        };
        found.push(name);
    }
    let description = tag(exif, "SVG:Desc").to_lowercase();
    if let Some(name) = [(" gnuplot ", "GNU Plot"), (" chemtool ", "Chemtool"), (" vectorfieldplot ", "VectorFieldPlot")]
        .into_iter()
        .find_map(|(needle, name)| description.contains(needle).then_some(name))
    {
        found.push(name);
    }
    if tag(exif, "PNG:Comment").to_lowercase().contains(" stella4d ") {
        found.push("Stella");
    }
    found
}
