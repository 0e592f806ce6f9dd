//! Architectural Contract Test: Membership
//!
//! This test verifies the service-facing membership semantics.
//!
//! Constraints verified:
//! - An added address is a member immediately and stays one until removed
//! - A stored network covers every address under its prefix, base and
//!   all-ones included
//! - Batch queries use the documented empty-input conventions
//! - Mixed-family batches split per address and combine across families
//!
//! If this test fails, someone has changed membership semantics, not
//! just an implementation detail.

mod common;

use common::*;
use ipfence_core::traits::IpStore;

#[tokio::test]
async fn added_address_is_member_until_removed() {
    let store = memory_store();
    let addr = ip("203.0.113.7");

    assert!(!store.has_ip(addr).await.unwrap());

    store.add_ip(addr).await.unwrap();
    assert!(store.has_ip(addr).await.unwrap());

    // Unrelated mutations do not disturb it.
    store.add_network("10.0.0.0/8").await.unwrap();
    store.remove_network("10.0.0.0/8").await.unwrap();
    assert!(store.has_ip(addr).await.unwrap());

    store.remove_ip(addr).await.unwrap();
    assert!(!store.has_ip(addr).await.unwrap());
}

#[tokio::test]
async fn network_covers_entire_prefix() {
    let store = memory_store();
    store.add_network("192.168.0.0/16").await.unwrap();

    // Base, all-ones, and interior addresses.
    assert!(store.has_ip(ip("192.168.0.0")).await.unwrap());
    assert!(store.has_ip(ip("192.168.255.255")).await.unwrap());
    assert!(store.has_ip(ip("192.168.42.17")).await.unwrap());

    // Just outside on either side.
    assert!(!store.has_ip(ip("192.167.255.255")).await.unwrap());
    assert!(!store.has_ip(ip("192.169.0.0")).await.unwrap());
}

#[tokio::test]
async fn families_never_match_each_other() {
    let store = memory_store();
    store.add_network("0.0.0.0/0").await.unwrap();

    // A v4 catch-all says nothing about v6 membership.
    assert!(store.has_ip(ip("8.8.8.8")).await.unwrap());
    assert!(!store.has_ip(ip("2001:db8::1")).await.unwrap());
}

#[tokio::test]
async fn batch_queries_use_vacuous_defaults() {
    let store = memory_store();
    store.add_ip(ip("1.1.1.1")).await.unwrap();

    // Deliberate convention: any over nothing is false, all over
    // nothing is true.
    assert!(!store.has_any_ip(&[]).await.unwrap());
    assert!(store.has_all_ips(&[]).await.unwrap());
}

#[tokio::test]
async fn batch_queries_combine_across_families() {
    let store = memory_store();
    store.add_network("10.0.0.0/8").await.unwrap();
    store.add_network("2001:db8::/32").await.unwrap();

    let both = [ip("10.1.2.3"), ip("2001:db8::1")];
    assert!(store.has_any_ip(&both).await.unwrap());
    assert!(store.has_all_ips(&both).await.unwrap());

    let one_miss = [ip("10.1.2.3"), ip("2001:db9::1")];
    assert!(store.has_any_ip(&one_miss).await.unwrap());
    assert!(!store.has_all_ips(&one_miss).await.unwrap());

    let all_miss = [ip("11.0.0.1"), ip("2001:db9::1")];
    assert!(!store.has_any_ip(&all_miss).await.unwrap());
    assert!(!store.has_all_ips(&all_miss).await.unwrap());
}

#[tokio::test]
async fn overlapping_networks_both_match() {
    let store = memory_store();
    store.add_network("172.16.0.0/12").await.unwrap();
    store.add_network("172.16.5.0/24").await.unwrap();

    assert!(store.has_ip(ip("172.16.5.99")).await.unwrap());

    // Either overlap alone keeps the address a member.
    store.remove_network("172.16.5.0/24").await.unwrap();
    assert!(store.has_ip(ip("172.16.5.99")).await.unwrap());

    store.remove_network("172.16.0.0/12").await.unwrap();
    assert!(!store.has_ip(ip("172.16.5.99")).await.unwrap());
}

#[tokio::test]
async fn end_to_end_network_lifecycle() {
    let store = memory_store();

    store.add_network("10.0.0.0/8").await.unwrap();
    assert!(store.has_ip(ip("10.5.6.7")).await.unwrap());
    assert!(!store.has_ip(ip("11.0.0.1")).await.unwrap());

    // Different host bits, same canonical range.
    store.remove_network("10.0.0.5/8").await.unwrap();
    assert!(!store.has_ip(ip("10.5.6.7")).await.unwrap());
}

#[tokio::test]
async fn end_to_end_ip_removal_leaves_network_coverage() {
    let store = memory_store();

    store.add_ip(ip("192.168.1.1")).await.unwrap();
    store.add_network("192.168.1.0/24").await.unwrap();

    store.remove_ip(ip("192.168.1.1")).await.unwrap();

    // Still covered by the network.
    assert!(store.has_ip(ip("192.168.1.1")).await.unwrap());
}
