use crate::error::PricingError;
use crate::models::SizeMargin;
use crate::service::calculator::round_money;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 11] = [
    "size",
    "quantity",
    "fabric_cost",
    "creation_cost",
    "supply_cost",
    "labor_cost",
    "fixed_cost",
    "cost",
    "margin_percent",
    "profit_value",
    "final_price",
];

fn money(v: f64) -> String {
    format!("{:.2}", round_money(v))
}

/// 输出尺码成本表 (金额两位小数)
pub fn write_size_table_csv<W: Write>(writer: W, margins: &[SizeMargin]) -> Result<(), PricingError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for m in margins {
        writer.write_record(&[
            m.size.clone(),
            m.quantity.to_string(),
            money(m.fabric_cost),
            money(m.creation_cost),
            money(m.supply_cost),
            money(m.labor_cost),
            money(m.fixed_cost),
            money(m.cost),
            money(m.margin_percent),
            money(m.profit_value),
            money(m.final_price),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出到文件
pub fn export_to_csv(margins: &[SizeMargin], output_path: &Path) -> Result<(), PricingError> {
    let file = std::fs::File::create(output_path)?;
    write_size_table_csv(file, margins)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margin(size: &str, cost: f64) -> SizeMargin {
        SizeMargin {
            size: size.to_string(),
            quantity: 3,
            fabric_cost: cost,
            creation_cost: 0.0,
            supply_cost: 0.0,
            labor_cost: 0.0,
            fixed_cost: 0.0,
            cost,
            margin_percent: 20.0,
            profit_value: cost * 0.2,
            final_price: cost * 1.2,
        }
    }

    #[test]
    fn writes_header_and_rounded_rows() {
        let mut buf = Vec::new();
        write_size_table_csv(&mut buf, &[margin("P", 11.0), margin("M", 0.22 * 50.0 * 1.1)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("size,quantity,fabric_cost"));
        assert_eq!(lines[1], "P,3,11.00,0.00,0.00,0.00,0.00,11.00,20.00,2.20,13.20");
        assert!(lines[2].ends_with(",12.10,20.00,2.42,14.52"));
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join(format!("iatex-sizes-{}.csv", std::process::id()));
        export_to_csv(&[margin("G", 10.0)], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("G,3,10.00"));
        let _ = std::fs::remove_file(&path);
    }
}
