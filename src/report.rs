//! Text assembly for one product's stock summary.

/// Marker substring in a shop name meaning the item is out of stock there.
pub const OUT_OF_STOCK_MARKER: &str = "缺貨";

/// Accumulating text summary for one product, sent as a single message.
#[derive(Debug, Clone)]
pub struct Report {
    text: String,
}

impl Report {
    /// Start a report with the localized header line for `product`.
    pub fn for_product(product: &str) -> Self {
        Self {
            text: format!("{product} 的庫存狀況：\n"),
        }
    }

    /// Append one shop line. Shops flagged with the out-of-stock marker drop
    /// the leading status token of their name and get the out-of-stock
    /// suffix; everything else carries the stock value verbatim, even when
    /// empty.
    pub fn push_shop(&mut self, shop: &str, stock: &str) {
        if shop.contains(OUT_OF_STOCK_MARKER) {
            let name = shop
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim_start())
                .unwrap_or("");
            self.text.push_str(&format!("• {name}：缺貨 QQ\n"));
        } else {
            self.text.push_str(&format!("• {shop}：{stock}\n"));
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_header_line() {
        let report = Report::for_product("Widget X");
        assert_eq!(report.as_str(), "Widget X 的庫存狀況：\n");
    }

    #[test]
    fn test_in_stock_line_uses_stock_verbatim() {
        let mut report = Report::for_product("Widget X");
        report.push_shop("Store A", "12");
        assert_eq!(report.as_str(), "Widget X 的庫存狀況：\n• Store A：12\n");
    }

    #[test]
    fn test_in_stock_line_keeps_empty_stock_value() {
        let mut report = Report::for_product("Widget X");
        report.push_shop("Store A", "");
        assert_eq!(report.as_str(), "Widget X 的庫存狀況：\n• Store A：\n");
    }

    #[rstest]
    #[case("缺貨 Store B", "• Store B：缺貨 QQ\n")]
    #[case("缺貨 Midtown Flagship", "• Midtown Flagship：缺貨 QQ\n")]
    #[case("缺貨", "• ：缺貨 QQ\n")]
    fn test_out_of_stock_line_drops_leading_token(
        #[case] shop: &str,
        #[case] expected_line: &str,
    ) {
        let mut report = Report::for_product("Widget X");
        report.push_shop(shop, "whatever");
        let line = report.as_str().lines().nth(1).map(|l| format!("{l}\n"));
        assert_eq!(line.as_deref(), Some(expected_line));
    }

    #[test]
    fn test_out_of_stock_line_never_contains_leading_token() {
        let mut report = Report::for_product("Widget X");
        report.push_shop("缺貨 Store B", "3");
        let body = report.as_str().lines().nth(1).unwrap().to_string();
        assert!(!body.contains("缺貨 Store"));
        assert!(body.ends_with("缺貨 QQ"));
    }

    #[test]
    fn test_full_example_report() {
        let mut report = Report::for_product("Widget X");
        report.push_shop("Store A", "12");
        report.push_shop("缺貨 Store B", "");
        assert_eq!(
            report.into_text(),
            "Widget X 的庫存狀況：\n• Store A：12\n• Store B：缺貨 QQ\n"
        );
    }
}
