use serde_json::json;

use crate::common::{TestApp, coffee_body, roastery_body, routes, shop_body};

/// A user with one roastery, one coffee and one shop to review.
struct Fixture {
    app: TestApp,
    token: String,
    user_id: i32,
    roastery_id: i32,
    coffee_id: i32,
    shop_id: i32,
}

async fn fixture() -> Fixture {
    let app = TestApp::spawn().await;
    let (user_id, token) = app.create_user("alice", "securepass").await;
    let roastery_id = app.create_roastery(&token, "Hard Beans").await;
    let coffee_id = app.create_coffee(&token, roastery_id, "Huila").await;
    let shop_id = app.create_shop(&token, "Cafe Wawel").await;
    Fixture {
        app,
        token,
        user_id,
        roastery_id,
        coffee_id,
        shop_id,
    }
}

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

mod create {
    use super::*;

    #[tokio::test]
    async fn each_target_kind_can_be_reviewed() {
        let f = fixture().await;

        for target in [
            json!({"coffeeId": f.coffee_id}),
            json!({"roasteryId": f.roastery_id}),
            json!({"coffeeShopId": f.shop_id}),
        ] {
            f.app.create_review(&f.token, target, 4).await;
        }

        let res = f.app.get_without_token(routes::REVIEWS).await;
        assert_eq!(res.body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn author_comes_from_the_token() {
        let f = fixture().await;

        let res = f
            .app
            .post_with_token(
                routes::REVIEWS,
                &json!({"rating": 5, "review": "Great", "coffeeId": f.coffee_id, "userId": 999}),
                &f.token,
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["userId"], f.user_id);
        assert_eq!(res.body["coffeeId"], f.coffee_id);
        assert!(res.body["roasteryId"].is_null());
        assert!(res.body["coffeeShopId"].is_null());
        assert!(res.body["dateOfCreation"].is_string());
    }

    #[tokio::test]
    async fn zero_targets_is_rejected() {
        let f = fixture().await;

        let res = f
            .app
            .post_with_token(routes::REVIEWS, &json!({"rating": 3, "review": "Hmm"}), &f.token)
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn two_targets_are_rejected() {
        let f = fixture().await;

        let res = f
            .app
            .post_with_token(
                routes::REVIEWS,
                &json!({
                    "rating": 3,
                    "review": "Hmm",
                    "coffeeId": f.coffee_id,
                    "roasteryId": f.roastery_id,
                }),
                &f.token,
            )
            .await;

        assert_eq!(res.status, 400);
        let list = f.app.get_without_token(routes::REVIEWS).await;
        assert!(list.body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_outside_one_to_five_is_rejected() {
        let f = fixture().await;

        for rating in [0, 6, -1] {
            let res = f
                .app
                .post_with_token(
                    routes::REVIEWS,
                    &json!({"rating": rating, "review": "Hmm", "coffeeId": f.coffee_id}),
                    &f.token,
                )
                .await;
            assert_eq!(res.status, 400, "rating {rating} accepted");
        }
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let f = fixture().await;

        let res = f
            .app
            .post_with_token(
                routes::REVIEWS,
                &json!({"rating": 3, "review": "", "coffeeId": f.coffee_id}),
                &f.token,
            )
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_target_is_not_found() {
        let f = fixture().await;

        for target in [
            json!({"coffeeId": 999}),
            json!({"roasteryId": 999}),
            json!({"coffeeShopId": 999}),
        ] {
            let mut body = json!({"rating": 3, "review": "Hmm"});
            body.as_object_mut()
                .unwrap()
                .extend(target.as_object().unwrap().clone());

            let res = f.app.post_with_token(routes::REVIEWS, &body, &f.token).await;
            assert_eq!(res.status, 404, "{}", res.text);
            assert_eq!(res.body["code"], "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn anonymous_create_is_rejected() {
        let f = fixture().await;

        let res = f
            .app
            .post_without_token(
                routes::REVIEWS,
                &json!({"rating": 3, "review": "Hmm", "coffeeId": f.coffee_id}),
            )
            .await;

        assert_eq!(res.status, 401);
    }
}

mod read {
    use super::*;

    #[tokio::test]
    async fn created_record_round_trips_exactly() {
        let f = fixture().await;
        let body = json!({
            "rating": 4,
            "review": "  Juicy, with a\nlong finish  ",
            "coffeeShopId": f.shop_id,
        });

        let created = f.app.post_with_token(routes::REVIEWS, &body, &f.token).await;
        assert_eq!(created.status, 200, "{}", created.text);

        let res = f.app.get_without_token(&routes::review(created.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, created.body);
        assert_eq!(res.body["id"], created.id());
        assert_eq!(res.body["userId"], f.user_id);
        assert_eq!(res.body["rating"], body["rating"]);
        assert_eq!(res.body["review"], body["review"]);
        assert_eq!(res.body["coffeeShopId"], f.shop_id);
        assert!(res.body["coffeeId"].is_null());
        assert!(res.body["roasteryId"].is_null());
        assert!(res.body["dateOfCreation"].is_string());
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let f = fixture().await;

        let res = f.app.get_without_token(&routes::review(31)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn filters_by_target() {
        let f = fixture().await;
        let on_coffee = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 4)
            .await;
        let on_shop = f
            .app
            .create_review(&f.token, json!({"coffeeShopId": f.shop_id}), 2)
            .await;

        let by_coffee = f
            .app
            .get_without_token(&format!("/reviews?coffeeId={}", f.coffee_id))
            .await;
        assert_eq!(ids(&by_coffee.body), vec![on_coffee as i64]);

        let by_shop = f
            .app
            .get_without_token(&format!("/reviews?coffeeShopId={}", f.shop_id))
            .await;
        assert_eq!(ids(&by_shop.body), vec![on_shop as i64]);

        let by_roastery = f
            .app
            .get_without_token(&format!("/reviews?roasteryId={}", f.roastery_id))
            .await;
        assert!(ids(&by_roastery.body).is_empty());
    }

    #[tokio::test]
    async fn filters_by_author_and_rating() {
        let f = fixture().await;
        let (bob_id, bob) = f.app.create_user("bob", "securepass").await;
        f.app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 5)
            .await;
        let low = f
            .app
            .create_review(&bob, json!({"coffeeId": f.coffee_id}), 1)
            .await;
        let high = f
            .app
            .create_review(&bob, json!({"coffeeId": f.coffee_id}), 4)
            .await;

        let by_bob = f
            .app
            .get_without_token(&format!("/reviews?userId={bob_id}"))
            .await;
        assert_eq!(ids(&by_bob.body), vec![low as i64, high as i64]);

        let bob_high = f
            .app
            .get_without_token(&format!("/reviews?userId={bob_id}&minRating=3"))
            .await;
        assert_eq!(ids(&bob_high.body), vec![high as i64]);

        let low_only = f.app.get_without_token("/reviews?maxRating=1").await;
        assert_eq!(ids(&low_only.body), vec![low as i64]);
    }

    #[tokio::test]
    async fn filters_by_creation_day() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 4)
            .await;
        let today = chrono::Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();
        let tomorrow = today.succ_opt().unwrap();

        let cases = [
            (format!("fromDate={today}"), vec![id as i64]),
            (format!("toDate={today}"), vec![id as i64]),
            (format!("fromDate={yesterday}&toDate={tomorrow}"), vec![id as i64]),
            (format!("fromDate={tomorrow}"), vec![]),
            (format!("toDate={yesterday}"), vec![]),
        ];
        for (query, expected) in cases {
            let res = f.app.get_without_token(&format!("/reviews?{query}")).await;
            assert_eq!(res.status, 200, "{query}: {}", res.text);
            assert_eq!(ids(&res.body), expected, "{query}");
        }
    }

    #[tokio::test]
    async fn malformed_date_is_rejected() {
        let f = fixture().await;

        let res = f.app.get_without_token("/reviews?fromDate=15-01-2024").await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn filters_by_reviewed_coffee() {
        let f = fixture().await;
        let mut natural = coffee_body(f.roastery_id, "Guji");
        natural["country"] = json!("Ethiopia");
        natural["process"] = json!("Natural");
        natural["roastProfile"] = json!("Light");
        natural["flavourNotes"] = json!(["Jasmine", "peach"]);
        let guji = f
            .app
            .post_with_token(routes::COFFEES, &natural, &f.token)
            .await
            .id();
        let on_huila = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 4)
            .await;
        let on_guji = f
            .app
            .create_review(&f.token, json!({"coffeeId": guji}), 5)
            .await;
        f.app
            .create_review(&f.token, json!({"roasteryId": f.roastery_id}), 3)
            .await;

        let cases = [
            ("coffeeCountry=ETHI", vec![on_guji as i64]),
            ("coffeeProcess=washed", vec![on_huila as i64]),
            ("coffeeRoastProfile=light", vec![on_guji as i64]),
            ("coffeeFlavour=choc", vec![on_huila as i64]),
            ("coffeeFlavour=jasmine&coffeeCountry=ethiopia", vec![on_guji as i64]),
            ("coffeeFlavour=jasmine&coffeeProcess=washed", vec![]),
        ];
        for (query, expected) in cases {
            let res = f.app.get_without_token(&format!("/reviews?{query}")).await;
            assert_eq!(res.status, 200, "{query}: {}", res.text);
            assert_eq!(ids(&res.body), expected, "{query}");
        }
    }

    #[tokio::test]
    async fn filters_by_reviewed_roastery_location() {
        let f = fixture().await;
        let mut berlin = roastery_body("Bonanza");
        berlin["country"] = json!("Germany");
        berlin["city"] = json!("Berlin");
        let bonanza = f
            .app
            .post_with_token(routes::ROASTERIES, &berlin, &f.token)
            .await
            .id();
        let on_krakow = f
            .app
            .create_review(&f.token, json!({"roasteryId": f.roastery_id}), 4)
            .await;
        let on_berlin = f
            .app
            .create_review(&f.token, json!({"roasteryId": bonanza}), 5)
            .await;
        f.app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 3)
            .await;

        let cases = [
            ("roasteryCountry=germ", vec![on_berlin as i64]),
            ("roasteryCity=KRAK", vec![on_krakow as i64]),
            ("roasteryCountry=poland&roasteryCity=berlin", vec![]),
        ];
        for (query, expected) in cases {
            let res = f.app.get_without_token(&format!("/reviews?{query}")).await;
            assert_eq!(res.status, 200, "{query}: {}", res.text);
            assert_eq!(ids(&res.body), expected, "{query}");
        }
    }

    #[tokio::test]
    async fn filters_by_reviewed_shop_location() {
        let f = fixture().await;
        let mut vienna = shop_body("Kaffeehaus");
        vienna["country"] = json!("Austria");
        vienna["city"] = json!("Vienna");
        let kaffeehaus = f
            .app
            .post_with_token(routes::SHOPS, &vienna, &f.token)
            .await
            .id();
        let on_katowice = f
            .app
            .create_review(&f.token, json!({"coffeeShopId": f.shop_id}), 4)
            .await;
        let on_vienna = f
            .app
            .create_review(&f.token, json!({"coffeeShopId": kaffeehaus}), 5)
            .await;
        f.app
            .create_review(&f.token, json!({"roasteryId": f.roastery_id}), 3)
            .await;

        let cases = [
            ("shopCountry=austria", vec![on_vienna as i64]),
            ("shopCity=katow", vec![on_katowice as i64]),
            ("shopCountry=Poland&minRating=5", vec![]),
        ];
        for (query, expected) in cases {
            let res = f.app.get_without_token(&format!("/reviews?{query}")).await;
            assert_eq!(res.status, 200, "{query}: {}", res.text);
            assert_eq!(ids(&res.body), expected, "{query}");
        }
    }

    #[tokio::test]
    async fn filters_on_different_target_kinds_match_nothing() {
        let f = fixture().await;
        for target in [
            json!({"coffeeId": f.coffee_id}),
            json!({"roasteryId": f.roastery_id}),
            json!({"coffeeShopId": f.shop_id}),
        ] {
            f.app.create_review(&f.token, target, 4).await;
        }

        let res = f
            .app
            .get_without_token("/reviews?coffeeCountry=colombia&shopCity=katowice")
            .await;

        assert_eq!(res.status, 200);
        assert!(ids(&res.body).is_empty());
    }

    #[tokio::test]
    async fn reviews_of_a_deleted_target_remain_listed() {
        let f = fixture().await;
        let review_id = f
            .app
            .create_review(&f.token, json!({"coffeeShopId": f.shop_id}), 3)
            .await;

        let res = f
            .app
            .delete_with_token(&routes::shop(f.shop_id), &f.token)
            .await;
        assert_eq!(res.status, 204);

        let fetched = f.app.get_without_token(&routes::review(review_id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["coffeeShopId"], f.shop_id);
    }
}

mod update {
    use super::*;

    #[tokio::test]
    async fn author_can_change_rating_and_text() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;
        let before = f.app.get_without_token(&routes::review(id)).await;

        let res = f
            .app
            .put_with_token(&routes::review(id), &json!({"rating": 5}), &f.token)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["rating"], 5);
        assert_eq!(res.body["review"], "Lovely cup");
        assert_eq!(res.body["dateOfCreation"], before.body["dateOfCreation"]);

        let res = f
            .app
            .put_with_token(&routes::review(id), &json!({"review": "Even better"}), &f.token)
            .await;
        assert_eq!(res.body["rating"], 5);
        assert_eq!(res.body["review"], "Even better");
    }

    #[tokio::test]
    async fn update_with_same_payload_twice_is_stable() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;
        let change = json!({"rating": 5, "review": " Better on the second try "});

        let first = f.app.put_with_token(&routes::review(id), &change, &f.token).await;
        let second = f.app.put_with_token(&routes::review(id), &change, &f.token).await;

        assert_eq!(first.status, 200, "{}", first.text);
        assert_eq!(second.status, 200, "{}", second.text);
        assert_eq!(first.body, second.body);
        assert_eq!(second.body["review"], " Better on the second try ");

        let fetched = f.app.get_without_token(&routes::review(id)).await;
        assert_eq!(fetched.body, second.body);
    }

    #[tokio::test]
    async fn target_cannot_be_changed() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;

        let res = f
            .app
            .put_with_token(
                &routes::review(id),
                &json!({"rating": 3, "coffeeShopId": f.shop_id}),
                &f.token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["coffeeId"], f.coffee_id);
        assert!(res.body["coffeeShopId"].is_null());
    }

    #[tokio::test]
    async fn other_users_cannot_edit() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;
        let bob = f.app.create_authenticated_user("bob", "securepass").await;

        let res = f
            .app
            .put_with_token(&routes::review(id), &json!({"rating": 5}), &bob)
            .await;

        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn invalid_rating_is_rejected() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;

        let res = f
            .app
            .put_with_token(&routes::review(id), &json!({"rating": 9}), &f.token)
            .await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn unknown_review_is_not_found() {
        let f = fixture().await;

        let res = f
            .app
            .put_with_token(&routes::review(404), &json!({"rating": 5}), &f.token)
            .await;

        assert_eq!(res.status, 404);
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn deleted_review_disappears_from_listings() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;

        let res = f.app.delete_with_token(&routes::review(id), &f.token).await;
        assert_eq!(res.status, 204);

        let list = f
            .app
            .get_without_token(&format!("/reviews?coffeeId={}", f.coffee_id))
            .await;
        assert!(ids(&list.body).is_empty());
        assert_eq!(f.app.get_without_token(&routes::review(id)).await.status, 404);
    }

    #[tokio::test]
    async fn other_users_cannot_delete() {
        let f = fixture().await;
        let id = f
            .app
            .create_review(&f.token, json!({"coffeeId": f.coffee_id}), 2)
            .await;
        let bob = f.app.create_authenticated_user("bob", "securepass").await;

        let res = f.app.delete_with_token(&routes::review(id), &bob).await;

        assert_eq!(res.status, 403);
        assert_eq!(f.app.get_without_token(&routes::review(id)).await.status, 200);
    }

    #[tokio::test]
    async fn unknown_review_is_not_found() {
        let f = fixture().await;

        let res = f.app.delete_with_token(&routes::review(12), &f.token).await;

        assert_eq!(res.status, 404);
    }
}
