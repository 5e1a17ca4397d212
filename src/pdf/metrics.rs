//! Anchos de glifos de las fuentes estándar (AFM de Adobe, en milésimas de em)
//! y codificación WinAnsi para el texto de los operadores `Tj`.

use crate::core::Font;

const FIRST_CHAR: u32 = 32;

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Rango 0x80–0x9F de WinAnsi: código, carácter y anchos (normal, negrita)
#[rustfmt::skip]
const WIN_ANSI_HIGH: [(u8, char, u16, u16); 27] = [
    (0x80, '€', 556, 556), (0x82, '‚', 222, 278), (0x83, 'ƒ', 556, 556),
    (0x84, '„', 333, 500), (0x85, '…', 1000, 1000), (0x86, '†', 556, 556),
    (0x87, '‡', 556, 556), (0x88, 'ˆ', 333, 333), (0x89, '‰', 1000, 1000),
    (0x8A, 'Š', 667, 667), (0x8B, '‹', 333, 333), (0x8C, 'Œ', 1000, 1000),
    (0x8E, 'Ž', 611, 611), (0x91, '‘', 222, 278), (0x92, '’', 222, 278),
    (0x93, '“', 333, 500), (0x94, '”', 333, 500), (0x95, '•', 350, 350),
    (0x96, '–', 556, 556), (0x97, '—', 1000, 1000), (0x98, '˜', 333, 333),
    (0x99, '™', 1000, 1000), (0x9A, 'š', 500, 556), (0x9B, '›', 333, 333),
    (0x9C, 'œ', 944, 944), (0x9E, 'ž', 500, 500), (0x9F, 'Ÿ', 667, 667),
];

fn win_ansi_high(c: char) -> Option<&'static (u8, char, u16, u16)> {
    WIN_ANSI_HIGH.iter().find(|entry| entry.1 == c)
}

fn glyph_width(font: Font, c: char) -> u16 {
    if let Some(&(_, _, regular, bold)) = win_ansi_high(c) {
        return match font {
            Font::Helvetica => regular,
            Font::HelveticaBold => bold,
        };
    }
    let table = match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    };
    // Letras acentuadas y símbolos latinos: se aproxima con su base
    let base = match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'É' | 'È' | 'Ë' => 'E',
        'Í' | 'Ì' => 'I',
        'Ó' | 'Ò' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Ü' => 'U',
        'Ñ' => 'N',
        '°' | 'º' | 'ª' => 'o',
        other => other,
    };
    let index = (base as u32).wrapping_sub(FIRST_CHAR) as usize;
    table.get(index).copied().unwrap_or(556)
}

/// Ancho en puntos de `text` compuesto en `font` a `size` puntos
pub fn text_width(font: Font, size: f32, text: &str) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(font, c))).sum();
    units as f32 * size / 1000.0
}

/// Codifica a WinAnsi. Los caracteres sin glifo en la codificación se
/// reemplazan por `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => win_ansi_high(c).map_or(b'?', |entry| entry.0),
        })
        .collect()
}

/// Inversa de [`encode_win_ansi`]
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => WIN_ANSI_HIGH
                .iter()
                .find(|entry| entry.0 == b)
                .map_or('?', |entry| entry.1),
            _ => char::from(b),
        })
        .collect()
}

/// Parte `text` en líneas que caben en `max_width`. Corta por palabras y,
/// si una palabra sola no cabe, por caracteres.
pub fn wrap_text(font: Font, size: f32, text: &str, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(font, size, &candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(font, size, word) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(font, size, &current) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_have_the_same_width_in_both_weights() {
        assert_eq!(text_width(Font::Helvetica, 10.0, "$123.45"), text_width(Font::HelveticaBold, 10.0, "$123.45"));
        assert_eq!(text_width(Font::Helvetica, 10.0, "0"), 5.56);
    }

    #[test]
    fn win_ansi_keeps_latin1_and_replaces_the_rest() {
        let encoded = encode_win_ansi("Dirección N° ☕");
        assert_eq!(encoded[7], 0xF3);
        assert_eq!(*encoded.last().unwrap(), b'?');
        assert_eq!(decode_win_ansi(&encode_win_ansi("Descripción")), "Descripción");
    }

    #[test]
    fn win_ansi_covers_typographic_punctuation_and_euro() {
        let text = "O’Brien — “Ñandú” … 10 €";
        let encoded = encode_win_ansi(text);
        assert_eq!(encoded[1], 0x92);
        assert!(encoded.contains(&0x97));
        assert_eq!(*encoded.last().unwrap(), 0x80);
        assert!(!encoded.contains(&b'?'));
        assert_eq!(decode_win_ansi(&encoded), text);
    }

    #[test]
    fn high_range_glyphs_use_their_own_widths() {
        assert_eq!(text_width(Font::Helvetica, 10.0, "—"), 10.0);
        assert_eq!(text_width(Font::Helvetica, 10.0, "’"), 2.22);
        assert_eq!(text_width(Font::HelveticaBold, 10.0, "’"), 2.78);
    }

    #[test]
    fn wrap_respects_width_and_keeps_all_words() {
        let text = "Av. Corrientes 1234, Piso 3 Depto. B, Ciudad Autónoma de Buenos Aires (1043), Buenos Aires";
        let lines = wrap_text(Font::Helvetica, 10.0, text, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(Font::Helvetica, 10.0, line) <= 150.0);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let lines = wrap_text(Font::Helvetica, 10.0, "WWWWWWWWWWWWWWWWWWWW", 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "WWWWWWWWWWWWWWWWWWWW");
    }

    #[test]
    fn wrap_of_empty_text_is_one_empty_line() {
        assert_eq!(wrap_text(Font::Helvetica, 10.0, "", 100.0), vec![String::new()]);
    }
}
