//! Sample asset bytes. Contents only need to be stable, not decodable.

/// PNG signature followed by a marker so different images differ.
pub fn png(marker: &str) -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    bytes.extend_from_slice(marker.as_bytes());
    bytes
}

pub fn jpeg(marker: &str) -> Vec<u8> {
    let mut bytes = vec![0xff, 0xd8, 0xff, 0xe0];
    bytes.extend_from_slice(marker.as_bytes());
    bytes
}

/// TrueType header followed by a marker.
pub fn ttf(marker: &str) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x01, 0x00, 0x00];
    bytes.extend_from_slice(marker.as_bytes());
    bytes
}

pub fn named(name: &str, bytes: Vec<u8>) -> (String, Vec<u8>) {
    (name.to_string(), bytes)
}

pub const STRUCTURE: &str = r#"<section class="cover">
  <h1>Báo cáo</h1>
  <img src="images/cover.png" alt="cover">
</section>
<p>See <img src="images/cover.png"> and <img src="images/a+b (1).jpg">.</p>"#;

pub const STYLE: &str = "h1 { font-family: 'Inter'; font-weight: 700; }\n.cover { page-break-after: always; }";

pub const BEHAVIOR: &str = "document.title = 'Report';";
