/// 16.16 fixed point to real.
pub fn fixed_16_16(v: u32) -> f64 {
    v as f64 / 65536.0
}

/// 8.8 fixed point to real.
pub fn fixed_8_8(v: u16) -> f64 {
    v as f64 / 256.0
}

/// Signed 8.8 fixed point (e.g. smhd balance).
pub fn fixed_8_8_signed(v: i16) -> f64 {
    v as f64 / 256.0
}

/// Unpack an ISO-639-2/T code stored as three 5-bit groups offset by 0x60.
pub fn lang_from_u16(code: u16) -> String {
    let c1 = ((code >> 10) & 0x1F) as u8 + 0x60;
    let c2 = ((code >> 5) & 0x1F) as u8 + 0x60;
    let c3 = (code & 0x1F) as u8 + 0x60;
    format!("{}{}{}", c1 as char, c2 as char, c3 as char)
}

/// Render a duration in whole seconds as "1 hour, 2 min, 3 sec".
pub fn format_seconds(sec: u64) -> String {
    let mut out = String::new();
    if sec > 3600 {
        out.push_str(&format!("{} hour, ", sec / 3600));
    }
    if sec > 60 {
        out.push_str(&format!("{} min, ", (sec % 3600) / 60));
    }
    out.push_str(&format!("{} sec", sec % 60));
    out
}

/// Duration in ticks rendered against a timescale; `None` when the timescale is zero.
pub fn format_duration(duration: u64, timescale: u32) -> Option<String> {
    (timescale != 0).then(|| format_seconds(duration / timescale as u64))
}

/// Bytes up to the first NUL, lossily decoded.
pub fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
