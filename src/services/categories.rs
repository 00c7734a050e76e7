// Readshelf filter vocabularies
// Slug/label tables for the category and author filters. The catalog matches
// on labels, so slugs coming from URLs or UI selects are translated first.

use crate::types::book::LabeledOption;

macro_rules! options {
    ($($value:literal => $label:literal),* $(,)?) => {
        &[$(LabeledOption { value: $value, label: $label }),*]
    };
}

/// Book categories offered by the search filters.
pub const CATEGORIES: &[LabeledOption] = options![
    // Economy & finance
    "ky-nang-song" => "Kỹ năng sống",
    "quan-tri" => "Quản trị",
    "phong-thuy" => "Phong thuỷ",
    "kinh-te-tai-chinh" => "Kinh tế – Tài chính",
    "tam-ly-hoc" => "Tâm lý học",
    // Adventure & horror
    "trinh-tham" => "Trinh thám",
    "vien-tuong" => "Viễn tưởng",
    "xuyen-khong" => "Xuyên không",
    "phieu-luu" => "Phiêu lưu",
    "kinh-di" => "Kinh dị",
    // Humour & romance
    "tieu-thuyet" => "Tiểu thuyết",
    "triet-hoc" => "Triết học",
    "lang-man" => "Lãng mạn",
    "hai-huoc" => "Hài hước",
    "y-hoc" => "Y học",
    // Period & wuxia
    "truyen-ngan" => "Truyện ngắn",
    "tien-hiep" => "Tiên hiệp",
    "kiem-hiep" => "Kiếm hiệp",
    "18plus" => "18+",
    // History & geography
    "lich-su" => "Lịch sử",
    "dia-ly" => "Địa lý",
    "van-hoa-xa-hoi" => "Văn Hoá – Xã Hội",
    "hoi-ki" => "Hồi kí",
    // Children & comics
    "thieu-nhi" => "Thiếu nhi",
    "tho-ca" => "Thơ ca",
    "truyen-tranh" => "Truyện tranh",
    "giao-duc" => "Giáo dục",
];

/// Authors offered by the search filters.
pub const AUTHORS: &[LabeledOption] = options![
    "nguyen-nhat-anh" => "Nguyễn Nhật Ánh",
    "nam-cao" => "Nam Cao",
    "to-hoai" => "Tô Hoài",
    "paulo-coelho" => "Paulo Coelho",
    "dale-carnegie" => "Dale Carnegie",
    "robert-martin" => "Robert C. Martin",
    "j-k-rowling" => "J.K. Rowling",
    "conan-doyle" => "Arthur Conan Doyle",
];

fn label_in<'a>(table: &[LabeledOption], slug: &'a str) -> &'a str {
    match table.iter().find(|opt| opt.value == slug) {
        Some(opt) => opt.label,
        None => slug,
    }
}

/// Label for a category slug; unknown slugs pass through unchanged.
pub fn category_label(slug: &str) -> &str {
    label_in(CATEGORIES, slug)
}

/// Label for an author slug; unknown slugs pass through unchanged.
pub fn author_label(slug: &str) -> &str {
    label_in(AUTHORS, slug)
}
