use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Skewed pick so a few values dominate, like real station usage.
    fn skewed<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let u = self.next_f64();
        items[((u * u) * items.len() as f64) as usize % items.len()]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

struct CitySpec {
    file: &'static str,
    trips: usize,
    stations: &'static [&'static str],
    demographics: bool,
}

const CITIES: [CitySpec; 3] = [
    CitySpec {
        file: "chicago.csv",
        trips: 3000,
        stations: &[
            "Streeter Dr & Grand Ave",
            "Lake Shore Dr & Monroe St",
            "Clinton St & Washington Blvd",
            "Canal St & Adams St",
            "Michigan Ave & Oak St",
            "Theater on the Lake",
        ],
        demographics: true,
    },
    CitySpec {
        file: "new_york_city.csv",
        trips: 3000,
        stations: &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "Broadway & E 22 St",
            "West St & Chambers St",
        ],
        demographics: true,
    },
    CitySpec {
        file: "washington.csv",
        trips: 2000,
        stations: &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dr & 14th St SW",
            "Massachusetts Ave & Dupont Circle NW",
        ],
        demographics: false,
    },
];

fn random_start(rng: &mut SimpleRng) -> NaiveDateTime {
    let year_start = NaiveDate::from_ymd_opt(2017, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    // January through June 2017 is 181 days
    let day = rng.below(181) as i64;
    // Commute peaks at 8h and 17h
    let hour = match rng.below(4) {
        0 => 8,
        1 => 17,
        _ => 6 + rng.below(17),
    } as i64;
    let second = rng.below(3600) as i64;
    year_start + Duration::days(day) + Duration::hours(hour) + Duration::seconds(second)
}

fn main() {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    let mut rng = SimpleRng::new(42);
    let genders = ["Male", "Female"];
    let user_types = ["Subscriber", "Customer"];

    for city in &CITIES {
        let path = out_dir.join(city.file);
        let mut writer = csv::Writer::from_path(&path).expect("Failed to create output file");

        let mut header = vec![
            "",
            "Start Time",
            "End Time",
            "Trip Duration",
            "Start Station",
            "End Station",
            "User Type",
        ];
        if city.demographics {
            header.extend(["Gender", "Birth Year"]);
        }
        writer.write_record(&header).expect("Failed to write header");

        for id in 0..city.trips {
            let start = random_start(&mut rng);
            let duration = 120 + rng.below(2400) as i64;
            let end = start + Duration::seconds(duration);

            let mut record = vec![
                id.to_string(),
                start.format("%Y-%m-%d %H:%M:%S").to_string(),
                end.format("%Y-%m-%d %H:%M:%S").to_string(),
                if rng.chance(0.01) { String::new() } else { duration.to_string() },
                rng.skewed(city.stations).to_string(),
                rng.skewed(city.stations).to_string(),
                if rng.chance(0.005) { String::new() } else { rng.skewed(&user_types).to_string() },
            ];
            if city.demographics {
                let missing = rng.chance(0.1);
                record.push(if missing { String::new() } else { rng.skewed(&genders).to_string() });
                record.push(if missing {
                    String::new()
                } else {
                    format!("{}.0", 1950 + rng.below(50))
                });
            }
            writer.write_record(&record).expect("Failed to write trip");
        }
        writer.flush().expect("Failed to flush output file");

        println!("Wrote {} trips to {}", city.trips, path.display());
    }
}
