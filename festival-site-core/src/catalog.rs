use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FestivalRecord {
    /// Display name, also the exact-match key.
    pub name: String,
    /// Date or recurrence as written on the site, never parsed.
    pub date: String,
    pub description: String,
    /// Detail resource of this festival.
    pub link: String,
    pub season: String,
}

impl FestivalRecord {
    fn new(name: &str, date: &str, description: &str, link: &str, season: &str) -> Self {
        Self {
            name: name.to_owned(),
            date: date.to_owned(),
            description: description.to_owned(),
            link: link.to_owned(),
            season: season.to_owned(),
        }
    }
}

/// Ordered, read-only list of festivals. Names are unique.
#[derive(Debug, Clone)]
pub struct FestivalCatalog {
    records: Vec<FestivalRecord>,
}

impl FestivalCatalog {
    pub fn new(records: Vec<FestivalRecord>) -> Result<Self, CatalogError> {
        let mut names = BTreeSet::new();
        for record in &records {
            if !names.insert(record.name.as_str()) {
                return Err(CatalogError::DuplicateName(record.name.clone()));
            }
        }
        Ok(Self { records })
    }

    /// Skips the uniqueness check, for exercising searches over broken catalogs.
    #[cfg(test)]
    pub(crate) const fn unchecked(records: Vec<FestivalRecord>) -> Self {
        Self { records }
    }

    /// The catalog the site ships with.
    #[must_use]
    pub fn shipped() -> Self {
        Self {
            records: shipped_records(),
        }
    }

    #[must_use]
    pub fn records(&self) -> &[FestivalRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FestivalRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn by_link(&self, link: &str) -> Option<&FestivalRecord> {
        self.records.iter().find(|record| record.link == link)
    }

    /// Seasons in order of first appearance, each with its festivals.
    #[must_use]
    pub fn by_season(&self) -> Vec<(&str, Vec<&FestivalRecord>)> {
        let mut groups: Vec<(&str, Vec<&FestivalRecord>)> = Vec::new();
        for record in &self.records {
            match groups
                .iter_mut()
                .find(|(season, _)| *season == record.season)
            {
                Some((_, members)) => members.push(record),
                None => groups.push((record.season.as_str(), vec![record])),
            }
        }
        groups
    }
}

fn shipped_records() -> Vec<FestivalRecord> {
    vec![
        FestivalRecord::new(
            "春节",
            "农历正月初一",
            "中国最重要的传统节日，象征着团圆、吉祥和新的开始。主要习俗包括贴春联、放鞭炮、吃年夜饭、拜年等。",
            "festival_spring.html",
            "春季",
        ),
        FestivalRecord::new(
            "元宵节",
            "农历正月十五",
            "又称上元节，主要习俗包括赏花灯、吃元宵、猜灯谜等，象征着团圆和美满。",
            "festival_lantern.html",
            "春季",
        ),
        FestivalRecord::new(
            "二月二龙抬头",
            "农历二月初二",
            "又称春耕节，主要习俗包括理发、吃猪头肉、祭龙王等，象征着万物复苏、春耕开始。",
            "festival_dragon_head.html",
            "春季",
        ),
        FestivalRecord::new(
            "寒食节",
            "清明节前一天",
            "主要习俗包括禁火、吃冷食、扫墓等，是为了纪念介子推而设立的节日。",
            "festival_cold_food.html",
            "春季",
        ),
        FestivalRecord::new(
            "清明节",
            "公历4月4日或5日",
            "是祭祀祖先和扫墓的节日，同时也是踏青、春游的好时节。",
            "festival_qingming.html",
            "春季",
        ),
        FestivalRecord::new(
            "端午节",
            "农历五月初五",
            "是为了纪念屈原而设立的节日，主要习俗包括吃粽子、赛龙舟、挂菖蒲等。",
            "festival_dragon.html",
            "夏季",
        ),
        FestivalRecord::new(
            "七夕节",
            "农历七月初七",
            "又称乞巧节，主要习俗包括穿针乞巧、拜织女、吃巧果等，是中国的传统情人节。",
            "festival_qixi.html",
            "秋季",
        ),
        FestivalRecord::new(
            "中元节",
            "农历七月十五",
            "又称鬼节，主要习俗包括祭祖、放河灯、烧纸钱等，是为了祭祀祖先和超度亡灵。",
            "festival_zhongyuan.html",
            "秋季",
        ),
        FestivalRecord::new(
            "中秋节",
            "农历八月十五",
            "是团圆的节日，主要习俗包括赏月、吃月饼、家人团聚等。",
            "festival_midautumn.html",
            "秋季",
        ),
        FestivalRecord::new(
            "重阳节",
            "农历九月初九",
            "又称老人节，主要习俗包括登高、插茱萸、赏菊花等，表达对老人的尊敬和祝福。",
            "festival_double_ninth.html",
            "秋季",
        ),
        FestivalRecord::new(
            "腊八节",
            "农历十二月初八",
            "主要习俗包括喝腊八粥、腌腊八蒜等，象征着丰收和吉祥。",
            "festival_laba.html",
            "冬季",
        ),
        FestivalRecord::new(
            "小年",
            "农历十二月二十三或二十四",
            "主要习俗包括祭灶、扫尘、贴窗花等，是春节的前奏。",
            "festival_little_new_year.html",
            "冬季",
        ),
        FestivalRecord::new(
            "除夕",
            "农历十二月最后一天",
            "是春节的前一天，主要习俗包括贴春联、挂灯笼、吃年夜饭、守岁等，象征着辞旧迎新。",
            "festival_new_year_eve.html",
            "冬季",
        ),
    ]
}
