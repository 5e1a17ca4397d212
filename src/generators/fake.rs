//! Datos ficticios con sabor argentino: razones sociales, domicilios y
//! descripciones de productos.

use rand::seq::SliceRandom;
use rand::Rng;

const SURNAMES: &[&str] = &[
    "González", "Rodríguez", "Gómez", "Fernández", "López", "Díaz", "Martínez", "Pérez",
    "García", "Sánchez", "Romero", "Sosa", "Torres", "Álvarez", "Ruiz", "Ramírez", "Flores",
    "Benítez", "Acosta", "Medina", "Herrera", "Suárez", "Aguirre", "Giménez", "Gutiérrez",
    "Pereyra", "Molina", "Castro", "Ortiz", "Silva",
];

const COMPANY_PATTERNS: &[CompanyPattern] = &[
    CompanyPattern::Single,
    CompanyPattern::Pair,
    CompanyPattern::Family,
    CompanyPattern::Associates,
];

const LEGAL_SUFFIXES: &[&str] = &["S.A.", "S.R.L.", "S.A.S.", "S.C.A.", "S.H."];

const STREETS: &[&str] = &[
    "Av. Corrientes", "Av. Santa Fe", "Av. Rivadavia", "Calle Florida", "Av. Belgrano",
    "Av. de Mayo", "Calle Lavalle", "Av. San Martín", "Calle Sarmiento", "Av. Callao",
    "Calle Tucumán", "Av. Libertador", "Calle Mitre", "Calle Moreno", "Av. Pueyrredón",
];

const CITIES: &[(&str, &str)] = &[
    ("Ciudad Autónoma de Buenos Aires", "Buenos Aires"),
    ("La Plata", "Buenos Aires"),
    ("Mar del Plata", "Buenos Aires"),
    ("Córdoba", "Córdoba"),
    ("Río Cuarto", "Córdoba"),
    ("Rosario", "Santa Fe"),
    ("Santa Fe", "Santa Fe"),
    ("Mendoza", "Mendoza"),
    ("San Miguel de Tucumán", "Tucumán"),
    ("Salta", "Salta"),
    ("Neuquén", "Neuquén"),
    ("Posadas", "Misiones"),
];

const PHRASE_NOUNS: &[&str] = &[
    "solución", "plataforma", "estrategia", "interfaz", "infraestructura", "capacidad",
    "metodología", "herramienta", "arquitectura", "red", "base de datos", "alianza",
    "aplicación", "iniciativa", "matriz",
];

const PHRASE_QUALIFIERS: &[&str] = &[
    "integral", "escalable", "proactiva", "modular", "optimizada", "descentralizada",
    "sincronizada", "personalizable", "robusta", "visionaria", "multicanal", "segura",
];

const PHRASE_FOCUS: &[&str] = &[
    "orientada a resultados", "de próxima generación", "con valor agregado", "en tiempo real",
    "centrada en el usuario", "de alto rendimiento", "basada en la nube", "de misión crítica",
    "multiplataforma", "a medida",
];

#[derive(Debug, Clone, Copy)]
enum CompanyPattern {
    Single,
    Pair,
    Family,
    Associates,
}

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, values: &'a [&'a str]) -> &'a str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Razón social, p. ej. `Gómez y Sosa S.R.L.`
pub fn company_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix = pick(rng, LEGAL_SUFFIXES);
    let pattern = COMPANY_PATTERNS
        .choose(rng)
        .copied()
        .unwrap_or(CompanyPattern::Single);

    match pattern {
        CompanyPattern::Single => format!("{} {}", pick(rng, SURNAMES), suffix),
        CompanyPattern::Pair => {
            let first = pick(rng, SURNAMES);
            let second = pick(rng, SURNAMES);
            format!("{} y {} {}", first, second, suffix)
        }
        CompanyPattern::Family => format!("{} e Hijos {}", pick(rng, SURNAMES), suffix),
        CompanyPattern::Associates => format!("{} y Asociados {}", pick(rng, SURNAMES), suffix),
    }
}

/// Domicilio en una sola línea, con las partes separadas por `", "`
pub fn address<R: Rng + ?Sized>(rng: &mut R) -> String {
    let street = pick(rng, STREETS);
    let number: u32 = rng.gen_range(1..=9999);
    let (city, province) = CITIES
        .choose(rng)
        .copied()
        .unwrap_or(("Ciudad Autónoma de Buenos Aires", "Buenos Aires"));
    let postal_code: u32 = rng.gen_range(1000..=9999);

    let mut parts = vec![format!("{} {}", street, number)];
    if rng.gen_bool(0.4) {
        let floor: u32 = rng.gen_range(1..=20);
        let apartment = (b'A' + rng.gen_range(0..8u8)) as char;
        parts.push(format!("Piso {} Depto. {}", floor, apartment));
    }
    parts.push(format!("{} ({})", city, postal_code));
    parts.push(province.to_string());

    parts.join(", ")
}

/// Descripción de producto a partir de una frase comercial en formato título
pub fn catch_phrase<R: Rng + ?Sized>(rng: &mut R) -> String {
    let phrase = format!(
        "{} {} {}",
        pick(rng, PHRASE_NOUNS),
        pick(rng, PHRASE_QUALIFIERS),
        pick(rng, PHRASE_FOCUS)
    );
    title_case(&phrase)
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
