//! Vietnamese value pools for personal fields.
//!
//! Each name is paired with an ASCII transliteration used to build email
//! addresses.

use rand::Rng;

pub(crate) const LAST_NAMES: [(&str, &str); 16] = [
    ("Nguyễn", "nguyen"),
    ("Trần", "tran"),
    ("Lê", "le"),
    ("Phạm", "pham"),
    ("Hoàng", "hoang"),
    ("Huỳnh", "huynh"),
    ("Phan", "phan"),
    ("Vũ", "vu"),
    ("Võ", "vo"),
    ("Đặng", "dang"),
    ("Bùi", "bui"),
    ("Đỗ", "do"),
    ("Hồ", "ho"),
    ("Ngô", "ngo"),
    ("Dương", "duong"),
    ("Lý", "ly"),
];

pub(crate) const FIRST_NAMES: [(&str, &str); 32] = [
    ("An", "an"),
    ("Bình", "binh"),
    ("Châu", "chau"),
    ("Dũng", "dung"),
    ("Giang", "giang"),
    ("Hà", "ha"),
    ("Hải", "hai"),
    ("Hạnh", "hanh"),
    ("Hiếu", "hieu"),
    ("Hoa", "hoa"),
    ("Hùng", "hung"),
    ("Hương", "huong"),
    ("Khánh", "khanh"),
    ("Lan", "lan"),
    ("Linh", "linh"),
    ("Long", "long"),
    ("Mai", "mai"),
    ("Minh", "minh"),
    ("Nam", "nam"),
    ("Ngọc", "ngoc"),
    ("Phong", "phong"),
    ("Phương", "phuong"),
    ("Quân", "quan"),
    ("Quỳnh", "quynh"),
    ("Sơn", "son"),
    ("Tâm", "tam"),
    ("Thảo", "thao"),
    ("Thu", "thu"),
    ("Trang", "trang"),
    ("Tuấn", "tuan"),
    ("Vy", "vy"),
    ("Yến", "yen"),
];

const EMAIL_DOMAINS: [&str; 5] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "fpt.vn",
];

const MOBILE_PREFIXES: [&str; 20] = [
    "032", "033", "034", "035", "036", "037", "038", "039", "070", "077", "078", "079", "083",
    "084", "085", "086", "090", "091", "096", "098",
];

const STREETS: [&str; 10] = [
    "Lê Lợi",
    "Nguyễn Huệ",
    "Trần Hưng Đạo",
    "Hai Bà Trưng",
    "Lý Thường Kiệt",
    "Điện Biên Phủ",
    "Cách Mạng Tháng Tám",
    "Phan Đình Phùng",
    "Nguyễn Trãi",
    "Lê Duẩn",
];

const CITIES: [&str; 7] = [
    "Hà Nội",
    "TP. Hồ Chí Minh",
    "Đà Nẵng",
    "Hải Phòng",
    "Cần Thơ",
    "Huế",
    "Nha Trang",
];

pub(crate) const USER_AGENTS: [&str; 6] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; SM-S921B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.0.0",
];

/// Pick a member of a non-empty constant pool.
pub(crate) fn pick<'a, R, T>(rng: &mut R, pool: &'a [T]) -> &'a T
where
    R: Rng + ?Sized,
{
    &pool[rng.random_range(0..pool.len())]
}

pub(crate) fn phone<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let prefix = pick(rng, &MOBILE_PREFIXES);
    let subscriber: u32 = rng.random_range(0..10_000_000);
    format!("{prefix}{subscriber:07}")
}

pub(crate) fn email<R>(rng: &mut R, first_ascii: &str, last_ascii: &str) -> String
where
    R: Rng + ?Sized,
{
    let domain = pick(rng, &EMAIL_DOMAINS);
    let suffix: u16 = rng.random_range(0..1_000);
    format!("{first_ascii}.{last_ascii}{suffix}@{domain}")
}

pub(crate) fn address<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    let number: u16 = rng.random_range(1..=500);
    let street = pick(rng, &STREETS);
    let ward: u8 = rng.random_range(1..=20);
    let district: u8 = rng.random_range(1..=12);
    let city = pick(rng, &CITIES);
    format!("{number} {street}, Phường {ward}, Quận {district}, {city}")
}
