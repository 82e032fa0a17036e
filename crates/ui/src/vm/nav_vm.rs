use intellitest_core::model::{AppView, Role};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItemVm {
    pub label: &'static str,
    pub view: AppView,
}

const NAV_ORDER: [NavItemVm; 4] = [
    NavItemVm {
        label: "Dashboard",
        view: AppView::Dashboard,
    },
    NavItemVm {
        label: "Available Tests",
        view: AppView::AvailableTests,
    },
    NavItemVm {
        label: "My Results",
        view: AppView::Results,
    },
    NavItemVm {
        label: "Live Monitoring",
        view: AppView::Monitoring,
    },
];

/// Sidebar entries the role may open, in display order.
#[must_use]
pub fn nav_items(role: Role) -> Vec<NavItemVm> {
    NAV_ORDER
        .iter()
        .copied()
        .filter(|item| role.can_view(item.view))
        .collect()
}
