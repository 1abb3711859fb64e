//! Screens rendered by the router.
//!
//! Admin screens share [`AdminLayout`]. Screens whose workflows live in
//! other services render a placeholder carrying the route title.

use std::future::Future;

use leptos::prelude::*;
use serde_json::Value;
use wasm_bindgen_futures::spawn_local;

use crate::app::AppContext;
use crate::components::layout::{AdminLayout, Link};
use crate::components::router::RouterContext;
use crate::config::{APP_NAME, APP_VERSION, api_defaults, paths};
use crate::core::error::ApiError;
use crate::models::{
    ApplyPricingPlan, ApproveTrade, ListOpportunities, ListTrades, MarkListed, MarkSold,
    Opportunity, RepriceOpenTrades, ResolvedRoute, SendBlockedToReview, TokenEntry,
    TokenImportProps, Trade, TradeStatus, ViewId,
};

/// Render the view for a resolved route.
pub fn render(route: &ResolvedRoute) -> AnyView {
    let title = route.meta().title.clone().unwrap_or_default();

    match route.view() {
        Some(ViewId::Home) => view! { <HomePage /> }.into_any(),
        Some(ViewId::TokenImport) => {
            let props = TokenImportProps::from_route(route);
            view! { <TokenImportPage props=props /> }.into_any()
        }
        Some(ViewId::DefaultLayout) => view! { <AdminLayout>{()}</AdminLayout> }.into_any(),
        Some(ViewId::Dashboard) => view! { <AdminLayout><Dashboard /></AdminLayout> }.into_any(),
        Some(ViewId::CardFlipOps) => {
            view! { <AdminLayout><CardFlipOps /></AdminLayout> }.into_any()
        }
        Some(view) if view.is_admin() => {
            view! { <AdminLayout><Placeholder title=title /></AdminLayout> }.into_any()
        }
        Some(ViewId::WebSocketTest) => view! { <Placeholder title=title /> }.into_any(),
        Some(ViewId::Generated(name)) => {
            let name = name.clone();
            view! {
                <section class="generated">
                    <h2>{title}</h2>
                    <p class="muted">{name}</p>
                </section>
            }
            .into_any()
        }
        _ => view! { <NotFoundPage /> }.into_any(),
    }
}

// ============================================================================
// Public screens
// ============================================================================

#[component]
fn HomePage() -> impl IntoView {
    view! {
        <section class="home">
            <h1>{APP_NAME}</h1>
            <p class="muted">"v" {APP_VERSION}</p>
            <Link to=paths::TOKEN_SETUP>"Token 管理"</Link>
        </section>
    }
}

#[component]
fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"404"</h1>
            <p>"页面不存在"</p>
            <Link to=paths::HOME>"返回首页"</Link>
        </section>
    }
}

#[component]
fn Placeholder(title: String) -> impl IntoView {
    view! {
        <section class="placeholder">
            <h2>{title}</h2>
        </section>
    }
}

// ============================================================================
// Token management
// ============================================================================

fn entry_from(name: &str, token: &str, props: &TokenImportProps) -> TokenEntry {
    TokenEntry {
        server: props.server.clone(),
        ws_url: props.ws_url.clone(),
        api: props.api.clone(),
        ..TokenEntry::new(name, token)
    }
}

#[component]
fn TokenImportPage(props: TokenImportProps) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let router = use_context::<RouterContext>().expect("RouterContext must be provided");

    let name = RwSignal::new(props.name.clone().unwrap_or_default());
    let token = RwSignal::new(props.token.clone().unwrap_or_default());
    let error = RwSignal::new(None::<String>);

    // Import, select and enter the console in one step
    let enter = move |entry: TokenEntry| {
        let imported = ctx.update_tokens(|registry| {
            let id = registry.import(entry)?;
            registry.select(&id)?;
            Ok(id)
        });
        match imported {
            Ok(id) => {
                tracing::info!(token = %id, "token selected");
                router.navigate(paths::DASHBOARD);
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    if props.auto {
        let entry = props
            .token
            .as_deref()
            .map(|t| entry_from(props.name.as_deref().unwrap_or_default(), t, &props));
        Effect::new(move |_| {
            if let Some(entry) = entry.clone() {
                enter(entry);
            }
        });
    }

    let submit_props = props.clone();
    let on_import = move |_| {
        let entry = entry_from(&name.get_untracked(), &token.get_untracked(), &submit_props);
        enter(entry);
    };

    let token_rows = move || {
        let selected = ctx.tokens.with(|r| r.snapshot().selected_token().map(str::to_string));
        ctx.tokens
            .with(|r| r.tokens().to_vec())
            .into_iter()
            .map(|entry| {
                let select_id = entry.id.clone();
                let remove_id = entry.id.clone();
                let is_selected = selected.as_deref() == Some(entry.id.as_str());
                view! {
                    <li class:selected=is_selected>
                        <span>{entry.name}</span>
                        {entry.server.map(|s| view! { <span class="muted">" @ " {s}</span> })}
                        {entry.ws_url.map(|u| view! { <span class="muted">" " {u}</span> })}
                        {entry.api.map(|a| view! { <span class="muted">" api " {a}</span> })}
                        <button on:click=move |_| {
                            let id = select_id.clone();
                            match ctx.update_tokens(|r| r.select(&id)) {
                                Ok(()) => router.navigate(paths::DASHBOARD),
                                Err(e) => error.set(Some(e.to_string())),
                            }
                        }>"使用"</button>
                        <button on:click=move |_| {
                            let id = remove_id.clone();
                            if let Err(e) = ctx.update_tokens(|r| Ok(r.remove(&id))) {
                                error.set(Some(e.to_string()));
                            }
                        }>"删除"</button>
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <section class="token-import">
            <h2>"Token 管理"</h2>
            <div class="token-form">
                <input
                    placeholder="名称"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    placeholder="Token"
                    prop:value=move || token.get()
                    on:input=move |ev| token.set(event_target_value(&ev))
                />
                <button on:click=on_import>"导入"</button>
                <button on:click=move |_| {
                    let cleared = ctx.update_tokens(|r| {
                        r.clear();
                        Ok(())
                    });
                    if let Err(e) = cleared {
                        error.set(Some(e.to_string()));
                    }
                }>"清空"</button>
            </div>
            {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
            <ul class="token-list">{token_rows}</ul>
        </section>
    }
}

// ============================================================================
// Admin screens
// ============================================================================

/// Outcome of the last API action on a screen.
#[derive(Clone, Debug, PartialEq)]
enum Outcome {
    Running(&'static str),
    Done(String),
    Failed(String),
}

/// Run an API call in the background and record its outcome.
fn spawn_action<Fut>(outcome: RwSignal<Option<Outcome>>, label: &'static str, call: Fut)
where
    Fut: Future<Output = Result<String, ApiError>> + 'static,
{
    outcome.set(Some(Outcome::Running(label)));
    spawn_local(async move {
        let result = match call.await {
            Ok(summary) => Outcome::Done(format!("{}: {}", label, summary)),
            Err(e) => Outcome::Failed(format!("{}: {}", label, e.message())),
        };
        outcome.set(Some(result));
    });
}

#[component]
fn OutcomeLine(outcome: RwSignal<Option<Outcome>>) -> impl IntoView {
    move || {
        outcome.get().map(|o| match o {
            Outcome::Running(label) => view! { <p class="muted">{label} "..."</p> }.into_any(),
            Outcome::Done(msg) => view! { <p class="ok">{msg}</p> }.into_any(),
            Outcome::Failed(msg) => view! { <p class="error">{msg}</p> }.into_any(),
        })
    }
}

fn price(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn percent(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}%", v * 100.0)).unwrap_or_else(|| "-".to_string())
}

fn text(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())
}

#[component]
fn Dashboard() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let outcome = RwSignal::new(None::<Outcome>);

    let check_health = move |_| {
        let api = ctx.api.get_value();
        spawn_action(outcome, "health", async move {
            api.health().await.map(|v| v.to_string())
        });
    };

    view! {
        <section class="dashboard">
            <h2>"控制台"</h2>
            <p class="muted">"API: " {ctx.api.with_value(|api| api.base_url().to_string())}</p>
            <button on:click=check_health>"检查服务"</button>
            <OutcomeLine outcome=outcome />
            <Link to="/admin/card-flip-ops">"卡片倒卖助手"</Link>
        </section>
    }
}

#[component]
fn CardFlipOps() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext must be provided");
    let outcome = RwSignal::new(None::<Outcome>);
    let detail = RwSignal::new(None::<String>);
    let opportunities = RwSignal::new(Vec::<Opportunity>::new());
    let trades = RwSignal::new(Vec::<Trade>::new());

    // Shared form inputs
    let all_statuses = RwSignal::new(false);
    let mode = RwSignal::new(api_defaults::PRICING_MODE.to_string());
    let note = RwSignal::new(String::new());
    let listing_url = RwSignal::new(String::new());
    let sold_price = RwSignal::new(String::new());

    let note_opt = move || Some(note.get_untracked()).filter(|n| !n.trim().is_empty());

    // Reflect an acknowledged status change in the trade table
    let apply_status = move |ack: &TradeStatus| {
        trades.update(|list| {
            if let Some(trade) = list.iter_mut().find(|t| t.trade_id == ack.trade_id) {
                trade.status = ack.status.clone();
                if ack.sold_price.is_some() {
                    trade.sold_price = ack.sold_price;
                }
            }
        });
    };

    let refresh_opportunities = move || {
        let api = ctx.api.get_value();
        let filter = if all_statuses.get_untracked() {
            ListOpportunities {
                status: None,
                ..ListOpportunities::default()
            }
        } else {
            ListOpportunities::default()
        };
        spawn_action(outcome, "opportunities", async move {
            let list = api.list_opportunities(filter).await?;
            let count = list.count;
            opportunities.set(list.items);
            Ok(format!("{} loaded", count))
        });
    };

    let refresh_trades = move || {
        let api = ctx.api.get_value();
        spawn_action(outcome, "trades", async move {
            let list = api.list_trades(ListTrades::default()).await?;
            let count = list.count;
            trades.set(list.items);
            Ok(format!("{} loaded", count))
        });
    };

    let scan = move |_| {
        let api = ctx.api.get_value();
        spawn_action(outcome, "scan", async move {
            let s = api.scan_opportunities(None).await?;
            Ok(format!(
                "processed {}, pending review {}, blocked {}, ignored {}",
                s.processed, s.pending_review, s.blocked_risk, s.ignored
            ))
        });
    };

    let batch_review = move |_| {
        let api = ctx.api.get_value();
        let params = SendBlockedToReview {
            note: note_opt().unwrap_or(SendBlockedToReview::default().note),
            ..SendBlockedToReview::default()
        };
        spawn_action(outcome, "batch review", async move {
            let r = api.send_blocked_to_review_batch(params).await?;
            Ok(format!(
                "scanned {}, eligible {} (risk <= {}), moved {}, no score {}",
                r.scanned, r.eligible, r.max_risk_score, r.moved, r.skipped_no_score
            ))
        });
    };

    let reprice = move |apply: bool| {
        let api = ctx.api.get_value();
        let params = RepriceOpenTrades {
            mode: mode.get_untracked(),
            apply,
            ..RepriceOpenTrades::default()
        };
        let label = if apply { "reprice" } else { "reprice preview" };
        spawn_action(outcome, label, async move {
            let r = api.reprice_open_trades(params).await?;
            let summary = format!(
                "{} ({}): {} processed, {} updated",
                r.mode,
                if r.apply { "applied" } else { "dry run" },
                r.processed,
                r.updated
            );
            detail.set(Some(format!("{:#}", Value::Array(r.items))));
            Ok(summary)
        });
    };

    let metrics = move |_| {
        let api = ctx.api.get_value();
        spawn_action(outcome, "metrics", async move {
            let summary = api.metrics().await?;
            detail.set(Some(format!("{:#}", summary)));
            Ok("loaded".to_string())
        });
    };

    let opportunity_rows = move || {
        opportunities
            .get()
            .into_iter()
            .map(|o| {
                let id = o.opportunity_id;
                let listing_id = o.listing_row_id;
                let buy_price = o.list_price.unwrap_or_default();
                let approve = move |_| {
                    let api = ctx.api.get_value();
                    let mut payload = ApproveTrade::new(id, buy_price);
                    if let Some(n) = note_opt() {
                        payload = payload.with_note(n);
                    }
                    spawn_action(outcome, "approve", async move {
                        let t = api.approve_trade(&payload).await?;
                        Ok(format!(
                            "trade {} {} (target {})",
                            t.trade_id,
                            t.status,
                            price(t.target_sell_price)
                        ))
                    });
                };
                let reject = move |_| {
                    let api = ctx.api.get_value();
                    let note = note_opt();
                    spawn_action(outcome, "reject", async move {
                        let s = api.reject_opportunity(id, note.as_deref()).await?;
                        Ok(format!("opportunity {} {}", s.opportunity_id, s.status))
                    });
                };
                let review = move |_| {
                    let api = ctx.api.get_value();
                    let note = note_opt();
                    spawn_action(outcome, "send to review", async move {
                        let s = api.send_opportunity_to_review(id, note.as_deref()).await?;
                        Ok(format!("opportunity {} {}", s.opportunity_id, s.status))
                    });
                };
                let show_listing = move |_| {
                    let api = ctx.api.get_value();
                    spawn_action(outcome, "listing", async move {
                        let listing = api.listing(listing_id).await?;
                        detail.set(Some(format!("{:#}", listing)));
                        Ok(format!("listing {}", listing_id))
                    });
                };
                view! {
                    <tr>
                        <td>{id}</td>
                        <td>{listing_id}</td>
                        <td>{o.title}</td>
                        <td>{price(o.list_price)}</td>
                        <td>{price(o.expected_sale_price)}</td>
                        <td>{price(o.suggested_list_price)}</td>
                        <td>{price(o.expected_profit)}</td>
                        <td>{percent(o.roi)}</td>
                        <td>{price(o.score)}</td>
                        <td>{o.status}</td>
                        <td>{text(o.risk_note)}</td>
                        <td>
                            <button on:click=approve>"批准"</button>
                            <button on:click=reject>"拒绝"</button>
                            <button on:click=review>"送审"</button>
                            <button on:click=show_listing>"商品"</button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    let trade_rows = move || {
        trades
            .get()
            .into_iter()
            .map(|t| {
                let id = t.trade_id;
                let reload = move |_| {
                    let api = ctx.api.get_value();
                    spawn_action(outcome, "trade", async move {
                        let fresh = api.trade(id).await?;
                        let status = fresh.status.clone();
                        trades.update(|list| {
                            if let Some(slot) = list.iter_mut().find(|t| t.trade_id == id) {
                                *slot = fresh;
                            }
                        });
                        Ok(format!("trade {} {}", id, status))
                    });
                };
                let mark_listed = move |_| {
                    let url = listing_url.get_untracked().trim().to_string();
                    if url.is_empty() {
                        outcome.set(Some(Outcome::Failed("mark listed: 请填写商品链接".to_string())));
                        return;
                    }
                    let api = ctx.api.get_value();
                    let payload = MarkListed {
                        note: note_opt().unwrap_or_default(),
                        ..MarkListed::new(url)
                    };
                    spawn_action(outcome, "mark listed", async move {
                        let ack = api.mark_trade_listed(id, &payload).await?;
                        apply_status(&ack);
                        Ok(format!("trade {} {}", ack.trade_id, ack.status))
                    });
                };
                let mark_sold = move |_| {
                    let Ok(amount) = sold_price.get_untracked().trim().parse::<f64>() else {
                        outcome.set(Some(Outcome::Failed("mark sold: 请填写成交价".to_string())));
                        return;
                    };
                    let api = ctx.api.get_value();
                    let payload = MarkSold {
                        note: note_opt().unwrap_or_default(),
                        ..MarkSold::new(amount)
                    };
                    spawn_action(outcome, "mark sold", async move {
                        let ack = api.mark_trade_sold(id, &payload).await?;
                        apply_status(&ack);
                        Ok(format!("trade {} {} at {}", ack.trade_id, ack.status, price(ack.sold_price)))
                    });
                };
                let preview_plan = move |_| {
                    let api = ctx.api.get_value();
                    let mode = mode.get_untracked();
                    spawn_action(outcome, "pricing plan", async move {
                        let r = api.trade_pricing_plan(id, Some(&mode)).await?;
                        detail.set(Some(format!("{:#}", r.plan)));
                        Ok(format!(
                            "trade {} {} [{}] {} (keyword {}, {} active)",
                            r.trade_id,
                            r.title,
                            r.status,
                            r.mode,
                            text(r.keyword),
                            r.active_trade_count.unwrap_or_default()
                        ))
                    });
                };
                let apply_plan = move |_| {
                    let api = ctx.api.get_value();
                    let params = ApplyPricingPlan {
                        mode: mode.get_untracked(),
                        note: note_opt().unwrap_or(ApplyPricingPlan::default().note),
                    };
                    spawn_action(outcome, "apply pricing plan", async move {
                        let r = api.apply_trade_pricing_plan(id, params).await?;
                        Ok(format!(
                            "trade {} {} {} ({}, {})",
                            r.trade_id,
                            r.mode,
                            r.action,
                            price(r.recommended_price),
                            if r.applied { "applied" } else { "unchanged" }
                        ))
                    });
                };
                let link = t.listing_url.clone().filter(|u| !u.is_empty());
                view! {
                    <tr>
                        <td>{id}</td>
                        <td>{t.opportunity_id}</td>
                        <td>{t.listing_row_id}</td>
                        <td>{t.title}</td>
                        <td>{price(t.source_list_price)}</td>
                        <td>{price(t.approved_buy_price)}</td>
                        <td>{price(t.target_sell_price)}</td>
                        <td>{price(t.sold_price)}</td>
                        <td>{t.status}</td>
                        <td>
                            {link.map(|url| {
                                let href = url.clone();
                                view! { <a href=href target="_blank">{url}</a> }
                            })}
                        </td>
                        <td>{text(t.approved_by)}</td>
                        <td>{text(t.note)}</td>
                        <td>{text(t.updated_at.or(t.created_at))}</td>
                        <td>
                            <button on:click=reload>"刷新"</button>
                            <button on:click=mark_listed>"已上架"</button>
                            <button on:click=mark_sold>"已售出"</button>
                            <button on:click=preview_plan>"定价方案"</button>
                            <button on:click=apply_plan>"应用定价"</button>
                        </td>
                    </tr>
                }
            })
            .collect_view()
    };

    let mode_options = api_defaults::PRICING_MODES
        .iter()
        .map(|m| view! { <option value=*m>{*m}</option> })
        .collect_view();

    view! {
        <section class="card-flip-ops">
            <h2>"卡片倒卖助手"</h2>
            <div class="toolbar">
                <button on:click=scan>"扫描机会"</button>
                <button on:click=move |_| refresh_opportunities()>"刷新机会"</button>
                <label>
                    <input
                        type="checkbox"
                        prop:checked=move || all_statuses.get()
                        on:change=move |_| all_statuses.update(|v| *v = !*v)
                    />
                    "全部状态"
                </label>
                <button on:click=move |_| refresh_trades()>"刷新交易"</button>
                <button on:click=batch_review>"批量送审"</button>
                <button on:click=move |_| reprice(false)>"重新定价预览"</button>
                <button on:click=move |_| reprice(true)>"批量重新定价"</button>
                <button on:click=metrics>"指标"</button>
            </div>
            <div class="inputs">
                <select
                    prop:value=move || mode.get()
                    on:change=move |ev| mode.set(event_target_value(&ev))
                >
                    {mode_options}
                </select>
                <input
                    placeholder="备注"
                    prop:value=move || note.get()
                    on:input=move |ev| note.set(event_target_value(&ev))
                />
                <input
                    placeholder="商品链接"
                    prop:value=move || listing_url.get()
                    on:input=move |ev| listing_url.set(event_target_value(&ev))
                />
                <input
                    placeholder="成交价"
                    prop:value=move || sold_price.get()
                    on:input=move |ev| sold_price.set(event_target_value(&ev))
                />
            </div>
            <OutcomeLine outcome=outcome />
            <h3>"机会"</h3>
            <table>
                <tbody>{opportunity_rows}</tbody>
            </table>
            <h3>"交易"</h3>
            <table>
                <tbody>{trade_rows}</tbody>
            </table>
            {move || detail.get().map(|d| view! { <pre class="detail">{d}</pre> })}
        </section>
    }
}
