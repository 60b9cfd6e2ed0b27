use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_POSTS: usize = 600;

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

    /// Index drawn with the given relative weights.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct SamplePost {
    sentiment: &'static str,
    platform: &'static str,
    country: &'static str,
    hashtags: String,
    hour: i64,
    likes: f64,
    retweets: f64,
}

const SENTIMENTS: [&str; 6] = ["Positive", "Negative", "Neutral", "Joy", "Excitement", "Sadness"];
const SENTIMENT_WEIGHTS: [f64; 6] = [0.30, 0.18, 0.16, 0.14, 0.12, 0.10];
const PLATFORMS: [&str; 3] = ["Twitter", "Instagram", "Facebook"];
const COUNTRIES: [&str; 8] = ["USA", "UK", "Canada", "India", "Australia", "Germany", "France", "Brazil"];
const COUNTRY_WEIGHTS: [f64; 8] = [0.28, 0.18, 0.14, 0.12, 0.10, 0.08, 0.06, 0.04];
const HASHTAGS: [&str; 12] = [
    "#Nature", "#Travel", "#Fitness", "#Food", "#Music", "#Tech",
    "#Friendship", "#Gratitude", "#Motivation", "#Art", "#Books", "#Weekend",
];

fn generate_post(rng: &mut SimpleRng) -> SamplePost {
    let s = rng.weighted(&SENTIMENT_WEIGHTS);
    let sentiment = SENTIMENTS[s];

    // Activity peaks around midday and in the evening.
    let hour_weights: Vec<f64> = (0..24)
        .map(|h: i32| {
            let midday = (-((h - 12) as f64).powi(2) / 18.0).exp();
            let evening = (-((h - 20) as f64).powi(2) / 8.0).exp();
            0.1 + midday + evening
        })
        .collect();
    let hour = rng.weighted(&hour_weights) as i64;

    let n_tags = 1 + (rng.next_u64() % 3) as usize;
    let hashtags = (0..n_tags)
        .map(|_| rng.pick(&HASHTAGS))
        .collect::<Vec<_>>()
        .join(" ");

    // Positive-leaning posts get more engagement.
    let boost = if s == 0 || s == 3 || s == 4 { 1.6 } else { 1.0 };
    let likes = (10.0 + 60.0 * rng.next_f64() * boost).round();
    let retweets = (likes * (0.3 + 0.4 * rng.next_f64())).round();

    SamplePost {
        sentiment,
        platform: rng.pick(&PLATFORMS),
        country: COUNTRIES[rng.weighted(&COUNTRY_WEIGHTS)],
        hashtags,
        hour,
        likes,
        retweets,
    }
}

fn write_csv(path: &str, posts: &[SamplePost]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record([
        "Unnamed: 0", "Sentiment", "Platform", "Country", "Hashtags", "Hour", "Likes", "Retweets",
    ])?;
    for (i, p) in posts.iter().enumerate() {
        // Every 97th row carries a malformed hour, as scraped exports do.
        let hour = if i % 97 == 96 {
            "n/a".to_string()
        } else {
            p.hour.to_string()
        };
        writer.write_record([
            i.to_string(),
            p.sentiment.to_string(),
            p.platform.to_string(),
            p.country.to_string(),
            p.hashtags.clone(),
            hour,
            p.likes.to_string(),
            p.retweets.to_string(),
        ])?;
    }
    writer.flush().with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_parquet(path: &str, posts: &[SamplePost]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Sentiment", DataType::Utf8, false),
        Field::new("Platform", DataType::Utf8, false),
        Field::new("Country", DataType::Utf8, false),
        Field::new("Hashtags", DataType::Utf8, false),
        Field::new("Hour", DataType::Int64, false),
        Field::new("Likes", DataType::Float64, false),
        Field::new("Retweets", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(posts.iter().map(|p| p.sentiment))),
            Arc::new(StringArray::from_iter_values(posts.iter().map(|p| p.platform))),
            Arc::new(StringArray::from_iter_values(posts.iter().map(|p| p.country))),
            Arc::new(StringArray::from_iter_values(posts.iter().map(|p| p.hashtags.as_str()))),
            Arc::new(Int64Array::from_iter_values(posts.iter().map(|p| p.hour))),
            Arc::new(Float64Array::from_iter_values(posts.iter().map(|p| p.likes))),
            Arc::new(Float64Array::from_iter_values(posts.iter().map(|p| p.retweets))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let posts: Vec<SamplePost> = (0..N_POSTS).map(|_| generate_post(&mut rng)).collect();

    write_csv("sample_posts.csv", &posts)?;
    write_parquet("sample_posts.parquet", &posts)?;

    println!("Wrote {} posts to sample_posts.csv and sample_posts.parquet", posts.len());
    Ok(())
}
