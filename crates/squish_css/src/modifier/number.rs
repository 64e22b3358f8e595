use crate::node::NumberValue;

/// Canonicalizes the digit text and folds long zero runs into a scientific
/// postfix.
pub(crate) fn minify_number(value: &mut NumberValue) {
    value.value = short_number(&value.value);
    replace_with_scientific_notation(value);
}

/// Strips leading zeros, and for fractions trailing zeros and the trailing
/// dot. An emptied value becomes `0`.
pub(crate) fn short_number(value: &str) -> String {
    let mut value = value.to_string();

    while value.starts_with('0') && value.len() > 1 {
        value.remove(0);
    }

    if value.contains('.') {
        while value.ends_with('0') {
            value.pop();
        }
        if value.ends_with('.') {
            value.pop();
        }
        if value.is_empty() {
            value = "0".to_string();
        }
    }

    value
}

/// `10000` becomes `1e4`: three or more trailing zeros on an integer move
/// into the scientific postfix.
fn replace_with_scientific_notation(value: &mut NumberValue) {
    if value.scientific.is_some() || value.value.contains('.') {
        return;
    }

    let zeros = value.value.chars().rev().take_while(|c| *c == '0').count();
    if zeros > 2 && zeros < value.value.len() {
        value.value.truncate(value.value.len() - zeros);
        value.scientific = Some(format!("e{zeros}"));
    }
}

/// `70` (percent) as a decimal number: `.7`
pub(crate) fn percentage_to_number(percentage: &str) -> String {
    let (int_part, frac_part) = percentage.split_once('.').unwrap_or((percentage, ""));
    let digits = format!("{int_part}{frac_part}");
    let shift = 2 + frac_part.len();

    let with_dot = if digits.len() <= shift {
        format!(".{}{}", "0".repeat(shift - digits.len()), digits)
    } else {
        format!(
            "{}.{}",
            &digits[..digits.len() - shift],
            &digits[digits.len() - shift..]
        )
    };

    short_number(&with_dot)
}

/// Number of fraction digits in the digit text
fn number_precision(value: &str) -> usize {
    value
        .split_once('.')
        .map(|(_, frac)| frac.len())
        .unwrap_or(0)
}

/// Truncates the fraction to at most `precision` digits
fn cut_number_to_precision(value: &str, precision: usize) -> String {
    match value.split_once('.') {
        Some((int_part, frac_part)) if frac_part.len() > precision => {
            if precision == 0 {
                int_part.to_string()
            } else {
                format!("{int_part}.{}", &frac_part[..precision])
            }
        }
        _ => value.to_string(),
    }
}

fn format_angle(angle: f64) -> String {
    short_number(&format!("{angle:.6}"))
}

const DEG_BASE: f64 = 360.0;
const GRAD_BASE: f64 = 400.0;
const RAD_BASE: f64 = std::f64::consts::PI;

/// Angle units known to the rewriter
pub(crate) fn is_angle_unit(unit: &str) -> bool {
    matches!(unit, "deg" | "grad" | "turn" | "rad")
}

/// Normalizes an angle dimension into `[0,360)` degrees and converts
/// `grad`/`turn`/`rad` to `deg` unless the result would be longer. Angles in
/// 350..360 degrees become short negative angles; negative angles of 100
/// degrees and more become positive. Returns false when nothing changed.
pub(crate) fn minify_angle(value: &mut NumberValue, unit: &mut String) -> bool {
    if !is_angle_unit(unit) {
        return false;
    }

    // Scientific postfixes do not mix with angle arithmetic
    if value.scientific.is_some() {
        return false;
    }

    if value.value == "0" {
        value.negative = false;
        *unit = "deg".to_string();
        return true;
    }

    let Ok(mut angle) = value.value.parse::<f64>() else {
        return false;
    };

    let mut negative = value.negative;
    let length_before = usize::from(value.negative) + value.value.len() + unit.len();

    match unit.as_str() {
        "grad" => {
            angle = angle / GRAD_BASE * DEG_BASE;
            while angle >= DEG_BASE {
                angle -= DEG_BASE;
            }

            if angle == 0.0 {
                value.negative = false;
                value.value = "0".to_string();
                *unit = "deg".to_string();
                return true;
            }
        }
        "turn" => {
            while angle >= 1.0 {
                angle -= 1.0;
            }

            if angle == 0.0 {
                value.negative = false;
                value.value = "0".to_string();
                *unit = "deg".to_string();
                return true;
            }

            angle *= DEG_BASE;
        }
        "rad" => {
            // The result is cut back to the precision of the input
            let precision = number_precision(&value.value);

            while angle >= RAD_BASE {
                angle -= RAD_BASE;
            }

            if angle == 0.0 {
                value.negative = false;
                value.value = "0".to_string();
                *unit = "deg".to_string();
                return true;
            }

            if negative && angle >= 1.0 && precision > 1 {
                angle = RAD_BASE - angle;
                negative = false;
            }

            value.negative = negative;
            value.value = short_number(&cut_number_to_precision(&format_angle(angle), precision));

            return true;
        }
        _ => {
            while angle >= DEG_BASE {
                angle -= DEG_BASE;
            }
        }
    }

    // 350..360deg => short negative angle
    if angle > DEG_BASE - 10.0 {
        angle = DEG_BASE - angle;
        negative = !negative;
    } else if value.negative {
        if angle >= 100.0 {
            angle = DEG_BASE - angle;
            negative = false;
        } else if angle == 0.0 {
            negative = false;
        }
    }

    let str_angle = format_angle(angle);
    let length_after = usize::from(negative) + str_angle.len() + "deg".len();

    if length_before >= length_after {
        value.negative = negative;
        value.value = str_angle;
        *unit = "deg".to_string();
        return true;
    }

    // A deg rendition that got longer: try a normalized grad instead
    if unit.as_str() == "grad" {
        let Ok(mut grad_angle) = value.value.parse::<f64>() else {
            return false;
        };

        if grad_angle > GRAD_BASE - 10.0 {
            grad_angle = GRAD_BASE - grad_angle;
            let str_angle = format_angle(grad_angle);
            let length_after = str_angle.len() + "grad".len() + 1;

            if length_before > length_after {
                value.negative = true;
                value.value = str_angle;
                return true;
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(text: &str) -> NumberValue {
        NumberValue::new(text)
    }

    #[test]
    fn short_number_strips_zeros() {
        assert_eq!(short_number("0.5"), ".5");
        assert_eq!(short_number("0.500"), ".5");
        assert_eq!(short_number("10.0"), "10");
        assert_eq!(short_number("0"), "0");
        assert_eq!(short_number("0.0"), "0");
        assert_eq!(short_number("007"), "7");
        assert_eq!(short_number("1.25"), "1.25");
    }

    #[test]
    fn integers_with_many_zeros_go_scientific() {
        let mut n = number("10000");
        minify_number(&mut n);
        assert_eq!(n.value, "1");
        assert_eq!(n.scientific.as_deref(), Some("e4"));

        let mut n = number("1200");
        minify_number(&mut n);
        assert_eq!(n.value, "1200");
        assert_eq!(n.scientific, None);

        // All zeros stay a plain zero
        let mut n = number("0");
        minify_number(&mut n);
        assert_eq!(n.value, "0");
        assert_eq!(n.scientific, None);
    }

    #[test]
    fn existing_scientific_postfix_is_kept() {
        let mut n = number("1000");
        n.scientific = Some("e2".to_string());
        minify_number(&mut n);
        assert_eq!(n.value, "1000");
        assert_eq!(n.scientific.as_deref(), Some("e2"));
    }

    #[test]
    fn percentage_conversion() {
        assert_eq!(percentage_to_number("70"), ".7");
        assert_eq!(percentage_to_number("100"), "1");
        assert_eq!(percentage_to_number("5"), ".05");
        assert_eq!(percentage_to_number("12.5"), ".125");
        assert_eq!(percentage_to_number("0"), "0");
    }

    #[test]
    fn grad_turn_rad_convert_to_deg() {
        let mut v = number("100");
        let mut unit = "grad".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert_eq!((v.to_string(), unit.clone()), ("90".to_string(), "deg".to_string()));

        let mut v = number(".5");
        let mut unit = "turn".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert_eq!((v.to_string(), unit.clone()), ("180".to_string(), "deg".to_string()));

        // rad stays rad, normalized into [0, pi)
        let mut v = number("4.71");
        let mut unit = "rad".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert_eq!(unit, "rad");
        assert_eq!(v.to_string(), "1.56");
    }

    #[test]
    fn angles_near_full_circle_go_negative() {
        let mut v = number("355");
        let mut unit = "deg".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert!(v.negative);
        assert_eq!(v.value, "5");

        let mut v = number("720");
        let mut unit = "deg".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert_eq!(v.to_string(), "0");
    }

    #[test]
    fn large_negative_angles_become_positive() {
        let mut v = number("270");
        v.negative = true;
        let mut unit = "deg".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert!(!v.negative);
        assert_eq!(v.value, "90");
    }

    #[test]
    fn zero_angle_loses_its_sign() {
        let mut v = number("0");
        v.negative = true;
        let mut unit = "rad".to_string();
        assert!(minify_angle(&mut v, &mut unit));
        assert!(!v.negative);
        assert_eq!((v.value.as_str(), unit.as_str()), ("0", "deg"));
    }
}
