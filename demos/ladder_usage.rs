// ============================================================================
// Ladder Usage Example
// ============================================================================

use bucket_price_ladder::prelude::*;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Bucket Price Ladder Example ===\n");

    let converter = IndexPriceConverter::standard();
    println!(
        "Ladder: {} buckets, prices {} .. {}\n",
        converter.max_fenwick_index() + 1,
        converter.min_price(),
        converter.max_price()
    );

    // Snap user-supplied target prices to their buckets
    println!("Target prices:");
    for target in ["2000", "100.0", "1.0", "0.00682", "1234.5678"] {
        let price = to_wad(target)?;
        let index = converter.price_to_index(&price)?;
        let bucket = converter.bucket_index_of(index)?;
        let canonical = converter.index_to_price(index)?;
        println!(
            "  {:>10} -> fenwick {:>4} (bucket {:>5}) @ {}",
            target, index, bucket, canonical
        );
    }

    // Invalid input is rejected before anything else happens
    println!("\nRejected input:");
    for target in ["1222333444", "0.00000005", "12,5"] {
        let result = to_wad(target).and_then(|price| converter.price_to_index(&price));
        if let Err(err) = result {
            println!("  {:>10} -> {}", target, err);
        }
    }
    if let Err(err) = converter.index_to_price(9999) {
        println!("  {:>10} -> {}", 9999, err);
    }

    // WAD arithmetic
    println!("\n=== WAD Arithmetic ===");
    let collateral = to_wad("112.20070213")?;
    let price = converter.index_to_price(2632)?;
    println!("  collateral value: {}", from_wad(&wmul(&collateral, &price)));
    println!("  1 / 3           : {}", from_wad(&wdiv(&Wad::one(), &to_wad("3")?)?));
    println!("  2 / 3           : {}", from_wad(&wdiv(&to_wad("2")?, &to_wad("3")?)?));

    // A ladder for a different deployment
    println!("\n=== Custom Domain ===");
    let domain = PriceDomain::derive(100, -100, to_wad("1.01")?)?;
    let ladder = BucketPriceLadder::generate(domain)?;
    println!(
        "  {} buckets from {} to {}",
        ladder.len(),
        ladder.prices()[ladder.len() - 1],
        ladder.prices()[0]
    );

    Ok(())
}
