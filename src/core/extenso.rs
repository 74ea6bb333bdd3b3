//! Portuguese cardinal numbers and currency amounts in words.

use crate::core::format::format_currency;

/// Largest value written out in words; anything above falls back to digits.
pub const MAX_EXTENSO: u64 = 999_999_999_999;

const UNIDADES: [&str; 20] = [
    "zero",
    "um",
    "dois",
    "três",
    "quatro",
    "cinco",
    "seis",
    "sete",
    "oito",
    "nove",
    "dez",
    "onze",
    "doze",
    "treze",
    "quatorze",
    "quinze",
    "dezesseis",
    "dezessete",
    "dezoito",
    "dezenove",
];

const DEZENAS: [&str; 10] = [
    "", "", "vinte", "trinta", "quarenta", "cinquenta", "sessenta", "setenta", "oitenta",
    "noventa",
];

const CENTENAS: [&str; 10] = [
    "",
    "cento",
    "duzentos",
    "trezentos",
    "quatrocentos",
    "quinhentos",
    "seiscentos",
    "setecentos",
    "oitocentos",
    "novecentos",
];

// 各千位群組的 (單數, 複數)，由大到小
const ESCALAS: [(&str, &str); 2] = [("bilhão", "bilhões"), ("milhão", "milhões")];

/// 1..=999 的文字
fn ate_999(n: u64) -> String {
    debug_assert!(n > 0 && n < 1000);
    if n == 100 {
        return "cem".to_string();
    }
    let centena = (n / 100) as usize;
    let resto = n % 100;

    let mut parts: Vec<String> = Vec::new();
    if centena > 0 {
        parts.push(CENTENAS[centena].to_string());
    }
    if resto > 0 {
        if resto < 20 {
            parts.push(UNIDADES[resto as usize].to_string());
        } else {
            let dezena = (resto / 10) as usize;
            let unidade = (resto % 10) as usize;
            parts.push(DEZENAS[dezena].to_string());
            if unidade > 0 {
                parts.push(UNIDADES[unidade].to_string());
            }
        }
    }
    parts.join(" e ")
}

/// Cardinal number in Portuguese words. Values above [`MAX_EXTENSO`] are
/// returned as their numeral string.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return UNIDADES[0].to_string();
    }
    if n > MAX_EXTENSO {
        return n.to_string();
    }

    let grupos = [
        n / 1_000_000_000,
        (n / 1_000_000) % 1000,
        (n / 1000) % 1000,
        n % 1000,
    ];

    let mut parts: Vec<(String, u64)> = Vec::new();
    for (i, &grupo) in grupos.iter().enumerate() {
        if grupo == 0 {
            continue;
        }
        let texto = match i {
            0..=1 => {
                let (singular, plural) = ESCALAS[i];
                let escala = if grupo == 1 { singular } else { plural };
                format!("{} {}", ate_999(grupo), escala)
            }
            2 if grupo == 1 => "mil".to_string(),
            2 => format!("{} mil", ate_999(grupo)),
            _ => ate_999(grupo),
        };
        parts.push((texto, grupo));
    }

    let mut out = String::new();
    let last = parts.len() - 1;
    for (i, (texto, grupo)) in parts.iter().enumerate() {
        if i > 0 {
            // 最後一組小於一百或為整百時以 "e" 連接
            if i == last && (*grupo < 100 || grupo % 100 == 0) {
                out.push_str(" e ");
            } else {
                out.push(' ');
            }
        }
        out.push_str(texto);
    }
    out
}

/// Monetary value in words: 1.5 → "um real e cinquenta centavos".
pub fn currency_to_words(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let total_centavos = (value.abs() * 100.0).round();
    if total_centavos / 100.0 > MAX_EXTENSO as f64 {
        return format_currency(value);
    }
    let total_centavos = total_centavos as u64;
    let reais = total_centavos / 100;
    let centavos = total_centavos % 100;

    let reais_texto = if reais == 0 {
        None
    } else {
        let unidade = if reais == 1 { "real" } else { "reais" };
        // "um milhão de reais", "dois bilhões de reais"
        let de = if reais >= 1_000_000 && reais % 1_000_000 == 0 {
            "de "
        } else {
            ""
        };
        Some(format!("{} {}{}", number_to_words(reais), de, unidade))
    };

    let centavos_texto = if centavos == 0 {
        None
    } else {
        let unidade = if centavos == 1 { "centavo" } else { "centavos" };
        Some(format!("{} {}", number_to_words(centavos), unidade))
    };

    let texto = match (reais_texto, centavos_texto) {
        (Some(r), Some(c)) => format!("{} e {}", r, c),
        (Some(r), None) => r,
        (None, Some(c)) => c,
        (None, None) => "zero reais".to_string(),
    };

    if value < 0.0 && total_centavos > 0 {
        format!("menos {}", texto)
    } else {
        texto
    }
}
