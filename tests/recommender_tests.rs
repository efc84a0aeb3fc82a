use std::sync::Arc;

use movie_recs_api::catalog::CatalogSnapshot;
use movie_recs_api::models::Movie;
use movie_recs_api::recommender::{
    BackendKind, NeighborIndexEngine, RecommendError, Recommender, RecommenderOptions,
    SimilarityMatrixEngine,
};

const BACKENDS: [BackendKind; 2] = [BackendKind::SimilarityMatrix, BackendKind::NeighborIndex];

fn scenario_catalog() -> Arc<CatalogSnapshot> {
    Arc::new(CatalogSnapshot::new(
        vec![
            Movie::new(862, "Toy Story", 1995)
                .with_genres(["Animation", "Comedy"])
                .with_overview("toys come to life"),
            Movie::new(9487, "A Bug's Life", 1998)
                .with_genres(["Animation", "Comedy"])
                .with_overview("bugs come to life"),
            Movie::new(949, "Heat", 1995)
                .with_genres(["Crime", "Thriller"])
                .with_overview("cops and robbers"),
        ],
        None,
    ))
}

fn larger_catalog() -> Arc<CatalogSnapshot> {
    Arc::new(CatalogSnapshot::new(
        vec![
            Movie::new(1, "Space Cowboy", 2000)
                .with_genres(["Western", "SciFi"])
                .with_companies(["Frontier Pictures"])
                .with_popularity(12.0),
            Movie::new(2, "Space Cowboy Returns", 2004)
                .with_genres(["Western", "SciFi"])
                .with_companies(["Frontier Pictures"])
                .with_popularity(9.5),
            Movie::new(3, "Desert Cowboy", 1971)
                .with_genres(["Western", "Drama"])
                .with_popularity(4.0),
            Movie::new(4, "Quiet Garden", 2015)
                .with_genres(["Romance"])
                .with_overview("a gardener and a widow")
                .with_popularity(1.2),
            Movie::new(5, "Night Shift", 1982)
                .with_genres(["Comedy"])
                .with_overview("a morgue becomes a business")
                .with_popularity(3.3),
            Movie::new(6, "Harbor Lights", 1999)
                .with_genres(["Drama", "Romance"])
                .with_popularity(0.0),
        ],
        None,
    ))
}

fn build(catalog: Arc<CatalogSnapshot>, backend: BackendKind) -> Recommender {
    Recommender::build(
        catalog,
        RecommenderOptions {
            backend,
            include_companies: true,
            default_top_n: 5,
        },
    )
    .unwrap()
}

#[test]
fn test_toy_story_scenario() {
    let catalog = scenario_catalog();
    let recommender = build(catalog.clone(), BackendKind::SimilarityMatrix);

    let row = catalog.resolve_title("toy story").unwrap();
    let titles = recommender.recommend(row, 2).unwrap();

    assert_eq!(titles, vec!["A Bug's Life", "Heat"]);
}

#[test]
fn test_ranking_follows_token_overlap() {
    let catalog = Arc::new(CatalogSnapshot::new(
        vec![
            Movie::new(1, "Space Cowboy", 2000).with_genres(["Western", "SciFi"]),
            Movie::new(2, "Space Cowboy Returns", 2004).with_genres(["Western", "SciFi"]),
            Movie::new(3, "Desert Cowboy", 1971).with_genres(["Western", "Drama"]),
            Movie::new(4, "Quiet Garden", 2015).with_genres(["Romance"]),
        ],
        None,
    ));
    let recommender = build(catalog, BackendKind::SimilarityMatrix);

    assert_eq!(
        recommender.recommend(0, 3).unwrap(),
        vec!["Space Cowboy Returns", "Desert Cowboy", "Quiet Garden"]
    );
}

#[test]
fn test_query_movie_is_never_recommended() {
    let catalog = larger_catalog();
    for backend in BACKENDS {
        let recommender = build(catalog.clone(), backend);
        for (row, movie) in catalog.movies().iter().enumerate() {
            let titles = recommender.recommend(row, 10).unwrap();
            assert!(
                !titles.contains(&movie.title),
                "{backend}: {} recommended for itself",
                movie.title
            );
        }
    }
}

#[test]
fn test_result_length_is_bounded_by_catalog() {
    let catalog = larger_catalog();
    let n = catalog.len();
    for backend in BACKENDS {
        let recommender = build(catalog.clone(), backend);
        for top_n in [1, 3, n - 1, n, n + 10] {
            let titles = recommender.recommend(0, top_n).unwrap();
            assert_eq!(titles.len(), top_n.min(n - 1), "{backend} top_n={top_n}");

            let mut unique = titles.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), titles.len(), "{backend} returned duplicates");
        }
    }
}

#[test]
fn test_single_movie_catalog_returns_nothing() {
    let catalog = Arc::new(CatalogSnapshot::new(vec![Movie::new(1, "Heat", 1995)], None));
    for backend in BACKENDS {
        let recommender = build(catalog.clone(), backend);
        assert!(recommender.recommend(0, 5).unwrap().is_empty());
    }
}

#[test]
fn test_out_of_range_index_is_an_error() {
    let catalog = larger_catalog();
    let n = catalog.len();
    for backend in BACKENDS {
        let recommender = build(catalog.clone(), backend);
        let err = recommender.recommend(n, 5).unwrap_err();
        assert!(
            matches!(err, RecommendError::InvalidIndex { index, len } if index == n && len == n),
            "{backend}: unexpected {err:?}"
        );
    }
}

#[test]
fn test_empty_catalog_rejects_every_query() {
    let catalog = Arc::new(CatalogSnapshot::new(Vec::new(), None));
    for backend in BACKENDS {
        let recommender = build(catalog.clone(), backend);
        assert!(matches!(
            recommender.recommend(0, 1),
            Err(RecommendError::InvalidIndex { index: 0, len: 0 })
        ));
    }
}

#[test]
fn test_rebuilds_are_deterministic() {
    for backend in BACKENDS {
        let first = build(larger_catalog(), backend);
        let second = build(larger_catalog(), backend);
        for row in 0..larger_catalog().len() {
            assert_eq!(
                first.recommend_by_id(row as i64 + 1, 4).unwrap(),
                second.recommend_by_id(row as i64 + 1, 4).unwrap()
            );
        }
    }
}

#[test]
fn test_similarity_matrix_symmetry() {
    let catalog = larger_catalog();
    let engine = SimilarityMatrixEngine::build(catalog.movies()).unwrap();
    let sim = engine.similarity();

    for i in 0..catalog.len() {
        assert_eq!(sim[[i, i]], 1.0);
        for j in 0..catalog.len() {
            assert_eq!(sim[[i, j]], sim[[j, i]]);
        }
    }
}

#[test]
fn test_scores_are_monotonic() {
    let catalog = larger_catalog();

    let similarity = build(catalog.clone(), BackendKind::SimilarityMatrix);
    let ranked = similarity.recommend_by_id(1, 5).unwrap();
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));

    let neighbors = build(catalog, BackendKind::NeighborIndex);
    let ranked = neighbors.recommend_by_id(1, 5).unwrap();
    assert!(ranked.windows(2).all(|w| w[0].score <= w[1].score));
}

#[test]
fn test_neighbor_index_finds_training_movie_first() {
    let catalog = larger_catalog();
    let engine = NeighborIndexEngine::build(catalog.movies(), true, 5).unwrap();

    for (row, movie) in catalog.movies().iter().enumerate() {
        let nearest = engine.nearest(movie, 1);
        assert_eq!(nearest[0].row, row);
        assert_eq!(nearest[0].score, 0.0);
    }
}

#[test]
fn test_sequels_are_nearest_neighbors() {
    let recommender = build(larger_catalog(), BackendKind::NeighborIndex);
    let ranked = recommender.recommend_by_id(1, 1).unwrap();
    assert_eq!(ranked[0].title, "Space Cowboy Returns");
}

#[test]
fn test_unbounded_top_n_returns_whole_catalog() {
    let catalog = scenario_catalog();
    for backend in BACKENDS {
        let recommender = build(catalog.clone(), backend);
        let titles = recommender.recommend(0, usize::MAX).unwrap();
        assert_eq!(titles.len(), catalog.len() - 1, "{backend}");
        assert!(!titles.contains(&"Toy Story".to_string()));
    }
}

#[test]
fn test_neighbor_index_sized_for_unbounded_default() {
    let recommender = Recommender::build(
        scenario_catalog(),
        RecommenderOptions {
            backend: BackendKind::NeighborIndex,
            include_companies: false,
            default_top_n: usize::MAX,
        },
    )
    .unwrap();
    assert_eq!(recommender.recommend(1, 1).unwrap().len(), 1);
}
