//! Deterministic keyword categorization.
//!
//! A table is an ordered list of (category, keywords) rules. Assignment is a
//! sequential substring test: the first rule with a keyword contained in the
//! description wins, and rows matching nothing fall into "Other". No scoring.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

pub const OTHER_CATEGORY: &str = "Other";

/// One ordered rule: category name plus the keywords that select it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Ordered category table. Rule order is significant: earlier rules shadow
/// later ones for descriptions matching both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTable {
    pub rules: Vec<CategoryRule>,
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// First-match-wins assignment for a single description.
    pub fn assign(&self, description: &str) -> &str {
        for rule in &self.rules {
            for kw in &rule.keywords {
                if description.contains(kw.as_str()) {
                    return &rule.name;
                }
            }
        }
        OTHER_CATEGORY
    }

    /// Stamp every transaction's category in place.
    pub fn categorize_all(&self, txns: &mut [Transaction]) {
        for t in txns {
            t.category = self.assign(&t.description).to_string();
        }
    }
}

fn rule(name: &str, keywords: &[&str]) -> CategoryRule {
    CategoryRule {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// First-pass table applied right after parsing.
pub fn base_table() -> CategoryTable {
    CategoryTable::new(vec![
        rule("Food & Dining", &[
            "餐廳", "食", "飲", "麥當勞", "星巴克", "便利商店", "超市", "7-11",
            "全家", "美食", "餐", "飯", "咖啡",
        ]),
        rule("Transportation", &[
            "捷運", "公車", "計程車", "加油", "停車", "UBER", "油站", "交通",
            "高鐵", "台鐵", "客運",
        ]),
        rule("Shopping", &[
            "百貨", "購物", "服飾", "電器", "網購", "商城", "AMAZON", "買",
            "購", "商店", "市場",
        ]),
        rule("Entertainment", &[
            "電影", "遊戲", "娛樂", "KTV", "健身", "運動", "書店", "音樂",
        ]),
        rule("Bills & Utilities", &[
            "電費", "水費", "瓦斯", "電信", "保險", "銀行", "費用", "帳單",
            "繳費",
        ]),
        rule("Healthcare", &["醫院", "診所", "藥局", "健康", "醫療", "牙科", "眼科"]),
        rule("Education", &["學校", "補習", "書店", "文具", "教育", "學費"]),
        rule("Travel", &["飯店", "機票", "旅遊", "住宿", "旅行", "HOTEL"]),
        rule("Cash/ATM", &["提款", "ATM", "現金", "轉帳", "匯款"]),
    ])
}

/// Cleaning-pass table: base keywords plus merchant-specific ones and the
/// Technology/Software and Business/Marketing categories.
pub fn enhanced_table() -> CategoryTable {
    CategoryTable::new(vec![
        rule("Food & Dining", &[
            "餐廳", "食", "飲", "麥當勞", "星巴克", "便利商店", "超市", "7-11",
            "全家", "美食", "餐", "飯", "咖啡", "cama", "杭州小籠包", "養心殿",
            "京星港式飲茶", "北村家", "吐司利亞", "優食", "Subway", "燒肉",
            "創義麵", "湘川", "珍蜜咖啡", "Fake Sober", "J WOW", "全聯福利中心",
        ]),
        rule("Transportation", &[
            "捷運", "公車", "計程車", "加油", "停車", "UBER", "油站", "交通",
            "高鐵", "台鐵", "客運", "台灣大車隊", "優步", "Taxi",
        ]),
        rule("Technology/Software", &[
            "CURSOR", "ADOBE", "OPENAI", "GOOGLE", "FIGMA", "HEYGEN", "SEASALT",
            "REPORTDASH", "MANYCHAT", "RSS.APP", "PADDLE", "LEONARDO", "Colab",
            "SPOTIFY", "ANTHROPIC", "Gandi", "APIFY", "SHOPIFY", "PCHOME",
        ]),
        rule("Shopping", &[
            "百貨", "購物", "服飾", "電器", "網購", "商城", "AMAZON", "買",
            "購", "商店", "市場", "IKEA", "宜家家居", "永昇五金", "今華電子",
            "源達科技",
        ]),
        rule("Entertainment", &[
            "電影", "遊戲", "娛樂", "KTV", "健身", "運動", "書店", "音樂", "錢櫃",
        ]),
        rule("Bills & Utilities", &[
            "電費", "水費", "瓦斯", "電信", "保險", "銀行", "費用", "帳單",
            "繳費", "手續費", "國外交易手續費", "ATT",
        ]),
        rule("Cash/ATM", &[
            "提款", "ATM", "現金", "轉帳", "匯款", "現金回饋", "自動扣繳",
        ]),
        rule("Business/Marketing", &["全球商務科技", "LINE Ads", "連加"]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        // "書店" appears under both Entertainment and Education in the base
        // table; the earlier rule must win.
        let table = base_table();
        assert_eq!(table.assign("誠品書店"), "Entertainment");
    }

    #[test]
    fn test_rule_order_within_custom_table() {
        let table = CategoryTable::new(vec![
            rule("A", &["COFFEE"]),
            rule("B", &["COFFEE", "TEA"]),
        ]);
        assert_eq!(table.assign("COFFEE SHOP"), "A");
        assert_eq!(table.assign("TEA HOUSE"), "B");
    }

    #[test]
    fn test_unmatched_falls_to_other() {
        let table = base_table();
        assert_eq!(table.assign("XYZZY 12345"), OTHER_CATEGORY);
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let table = enhanced_table();
        let a = table.assign("CURSOR, AI POWERED IDE").to_string();
        for _ in 0..10 {
            assert_eq!(table.assign("CURSOR, AI POWERED IDE"), a);
        }
        assert_eq!(a, "Technology/Software");
    }

    #[test]
    fn test_categorize_all_stamps_every_row() {
        let table = enhanced_table();
        let mut txns = vec![
            Transaction::new("05/02", "星巴克信義店", 165.0),
            Transaction::new("05/07", "OPENAI *CHATGPT SUBSCR", 645.0),
            Transaction::new("05/09", "noise", 10.0),
        ];
        table.categorize_all(&mut txns);
        assert_eq!(txns[0].category, "Food & Dining");
        assert_eq!(txns[1].category, "Technology/Software");
        assert_eq!(txns[2].category, OTHER_CATEGORY);
    }
}
